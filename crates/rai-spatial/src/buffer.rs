//! Metric buffering of WGS84 collections.
//!
//! Buffering by a distance in metres only makes sense in a projected CRS, so
//! the frame is reprojected into the working CRS, buffered there, and
//! reprojected to WGS84.

use geo::{Buffer, Geometry};
use tracing::debug;

use rai_core::Crs;

use crate::frame::GeoFrame;
use crate::project::reproject_frame;
use crate::{SpatialError, SpatialResult};

/// Buffer every geometry of `frame` by `size` metres measured in `projected`.
///
/// The result is always in [`Crs::WGS84`]; ids and attributes are unchanged.
///
/// # Errors
///
/// - [`SpatialError::NotProjected`] if `projected` is geographic.
/// - [`SpatialError::UnsupportedCrs`] if either CRS cannot be transformed.
pub fn create_buffer<T>(frame: &GeoFrame<T>, projected: Crs, size: f64) -> SpatialResult<GeoFrame<T>>
where
    T: Clone,
{
    if projected.is_geographic() {
        return Err(SpatialError::NotProjected(projected));
    }
    debug!(records = frame.len(), crs = %projected, size, "buffering frame");

    let working = reproject_frame(frame.clone(), projected)?;
    let buffered = working.map_geometry(|g| Geometry::MultiPolygon(g.buffer(size)));
    reproject_frame(buffered, Crs::WGS84)
}
