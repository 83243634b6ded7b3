//! Reading extracted road lines.
//!
//! [`FeatureSource`] is the seam between the pipeline and the file format.
//! The pipeline only needs a WGS84 [`GeoFrame<RoadTag>`]; how it is produced
//! (shapefile, test fixture, …) is the source's business.

use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::warn;

use rai_spatial::GeoFrame;

use crate::country::RoadTag;
use crate::OsmResult;

/// Produces road lines with their `highway` tag from a file on disk.
pub trait FeatureSource {
    fn read(&self, path: &Path) -> OsmResult<GeoFrame<RoadTag>>;
}

/// Read `path`, sleeping `delays[i]` and trying again after the `i`-th failure.
///
/// Makes `delays.len() + 1` attempts; the last error is returned.
pub fn read_with_retry<S: FeatureSource + ?Sized>(
    source: &S,
    path:   &Path,
    delays: &[Duration],
) -> OsmResult<GeoFrame<RoadTag>> {
    let mut delays = delays.iter();
    loop {
        match source.read(path) {
            Ok(frame) => return Ok(frame),
            Err(e) => match delays.next() {
                Some(&delay) => {
                    warn!(path = %path.display(), error = %e, ?delay, "read failed, retrying");
                    thread::sleep(delay);
                }
                None => return Err(e),
            },
        }
    }
}

#[cfg(feature = "shapefile")]
pub use shp::ShapefileSource;

#[cfg(feature = "shapefile")]
mod shp {
    use std::path::Path;

    use geo::Geometry;
    use shapefile::dbase::FieldValue;
    use tracing::debug;

    use rai_core::Crs;
    use rai_spatial::GeoFrame;

    use crate::country::RoadTag;
    use crate::{OsmError, OsmResult};

    /// Reads an `ogr2ogr`-extracted line shapefile in WGS84.
    ///
    /// The road tag comes from the `highway` column, or `fclass` for
    /// Geofabrik-style extracts.  Null shapes and rows without a tag are skipped.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct ShapefileSource;

    impl super::FeatureSource for ShapefileSource {
        fn read(&self, path: &Path) -> OsmResult<GeoFrame<RoadTag>> {
            let read_err = |e: shapefile::Error| OsmError::Read {
                path:    path.to_path_buf(),
                message: e.to_string(),
            };
            let mut reader = shapefile::Reader::from_path(path).map_err(read_err)?;

            let mut frame = GeoFrame::new(Crs::WGS84);
            let mut skipped = 0usize;
            for item in reader.iter_shapes_and_records() {
                let (shape, record) = item.map_err(read_err)?;
                let tag = ["highway", "fclass"].iter().find_map(|name| match record.get(name) {
                    Some(FieldValue::Character(Some(s))) if !s.trim().is_empty() => {
                        Some(s.trim().to_string())
                    }
                    _ => None,
                });
                let (Some(highway), Ok(geometry)) = (tag, Geometry::<f64>::try_from(shape)) else {
                    skipped += 1;
                    continue;
                };
                frame.push(geometry, RoadTag { highway })?;
            }
            debug!(path = %path.display(), rows = frame.len(), skipped, "shapefile read");
            Ok(frame)
        }
    }
}
