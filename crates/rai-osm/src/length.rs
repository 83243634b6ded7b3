//! Geodesic segment length on the WGS84 ellipsoid.

use geo::{Coord, Distance, Geodesic, Geometry, LineString, Point};

/// Length of a line geometry in kilometres.
///
/// Coordinates are read as `(lon, lat)`.  When any latitude falls outside
/// ±90° the line is assumed to be stored as `(lat, lon)` and every pair is
/// swapped before measuring.  Multi-part and collection geometries sum their
/// parts; points and polygons contribute zero.
pub fn line_length(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Line(l) => path_km(&[l.start, l.end]),
        Geometry::LineString(ls) => linestring_km(ls),
        Geometry::MultiLineString(mls) => mls.0.iter().map(linestring_km).sum(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(line_length).sum(),
        _ => 0.0,
    }
}

fn linestring_km(ls: &LineString<f64>) -> f64 {
    path_km(&ls.0)
}

fn path_km(coords: &[Coord<f64>]) -> f64 {
    let swapped = coords.iter().any(|c| c.y.abs() > 90.0);
    let point = |c: &Coord<f64>| if swapped { Point::new(c.y, c.x) } else { Point::from(*c) };
    let metres: f64 = coords
        .windows(2)
        .map(|w| Geodesic.distance(point(&w[0]), point(&w[1])))
        .sum();
    metres / 1000.0
}
