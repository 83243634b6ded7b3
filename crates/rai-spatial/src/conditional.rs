//! Row-wise conditional geometry transforms.
//!
//! Two flag-driven rules used when preparing road networks:
//!
//! - **clip to boundary**: a segment not flagged as lying within the country
//!   is cut down to its intersection with the country polygon;
//! - **remove overlap**: a segment flagged as touching an urban area loses the
//!   part inside it.
//!
//! Both are pure per-row functions; the frame-level wrappers only map them.

use geo::Geometry;

use crate::frame::{GeoFrame, Record};
use crate::ops;
use crate::overlay::map_records;

/// `geom` if `within_country`, otherwise `geom ∩ country`.
pub fn geom_within_country(
    geom: &Geometry<f64>,
    within_country: bool,
    country: &Geometry<f64>,
) -> Geometry<f64> {
    if within_country {
        geom.clone()
    } else {
        ops::intersection(geom, country)
    }
}

/// `geom − urban` if `inter_urb`, otherwise `geom`.
pub fn delete_roads_urb(
    geom: &Geometry<f64>,
    inter_urb: bool,
    urban: &Geometry<f64>,
) -> Geometry<f64> {
    if inter_urb {
        ops::difference(geom, urban)
    } else {
        geom.clone()
    }
}

/// Apply [`geom_within_country`] to every record, reading the flag with
/// `within_country`.  Records keep their ids even when the clip empties them.
pub fn clip_to_boundary<T, F>(frame: GeoFrame<T>, within_country: F, boundary: &Geometry<f64>) -> GeoFrame<T>
where
    T: Send + Sync,
    F: Fn(&T) -> bool + Send + Sync,
{
    transform_rows(frame, |r| geom_within_country(&r.geometry, within_country(&r.attrs), boundary))
}

/// Apply [`delete_roads_urb`] to every record, reading the flag with `inter_urb`.
pub fn remove_overlap<T, F>(frame: GeoFrame<T>, inter_urb: F, region: &Geometry<f64>) -> GeoFrame<T>
where
    T: Send + Sync,
    F: Fn(&T) -> bool + Send + Sync,
{
    transform_rows(frame, |r| delete_roads_urb(&r.geometry, inter_urb(&r.attrs), region))
}

fn transform_rows<T, F>(frame: GeoFrame<T>, f: F) -> GeoFrame<T>
where
    T: Send + Sync,
    F: Fn(&Record<T>) -> Geometry<f64> + Send + Sync,
{
    let computed = map_records(frame.records(), f);
    frame.replace_geometries(computed)
}
