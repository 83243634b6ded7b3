//! Multi-part explosion.
//!
//! Each multi-part geometry becomes one record per constituent part.  The
//! output attribute [`Part<T>`] carries the two-level identity
//! `(parent, part)` alongside a copy of the parent's attributes.

use geo::Geometry;

use rai_core::RowId;

use crate::frame::GeoFrame;
use crate::SpatialResult;

/// Attributes of one exploded part.
#[derive(Clone, Debug, PartialEq)]
pub struct Part<T> {
    /// Id of the record the part came from.
    pub parent: RowId,
    /// Zero-based position among the parent's parts.
    pub part:   u32,
    pub attrs:  T,
}

/// Split every multi-part geometry into single parts.
///
/// Single-part geometries yield exactly one part with `part == 0`.  Geometry
/// collections are flattened recursively; an empty multi-geometry yields no
/// parts.  Output ids are sequential; the CRS is preserved.
///
/// # Errors
///
/// [`crate::SpatialError::IdsExhausted`] if the output outgrows the id space.
pub fn explode<T: Clone>(frame: &GeoFrame<T>) -> SpatialResult<GeoFrame<Part<T>>> {
    let mut out = GeoFrame::new(frame.crs());
    for record in frame {
        let mut parts = Vec::new();
        single_parts(&record.geometry, &mut parts);
        for (k, geometry) in parts.into_iter().enumerate() {
            out.push(
                geometry,
                Part { parent: record.id, part: k as u32, attrs: record.attrs.clone() },
            )?;
        }
    }
    Ok(out)
}

fn single_parts(geom: &Geometry<f64>, out: &mut Vec<Geometry<f64>>) {
    match geom {
        Geometry::MultiPoint(mp) => out.extend(mp.iter().map(|p| Geometry::Point(*p))),
        Geometry::MultiLineString(mls) => {
            out.extend(mls.iter().map(|ls| Geometry::LineString(ls.clone())))
        }
        Geometry::MultiPolygon(mp) => out.extend(mp.iter().map(|p| Geometry::Polygon(p.clone()))),
        Geometry::GeometryCollection(gc) => gc.iter().for_each(|g| single_parts(g, out)),
        single => out.push(single.clone()),
    }
}
