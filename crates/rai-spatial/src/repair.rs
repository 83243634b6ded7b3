//! Geometry repair — the "buffer by zero" idiom.
//!
//! Areal parts are self-unioned: the overlay engine rebuilds every ring,
//! resolving self-intersections, duplicate vertices and inconsistent
//! orientation while keeping the covered area.  Lineal parts lose repeated
//! consecutive vertices; strings that collapse to fewer than two distinct
//! vertices are dropped.  Points pass through.
//!
//! Repair is idempotent up to geometric equivalence.

use geo::{BooleanOps, Coord, Geometry, LineString, MultiPolygon, Polygon};

use crate::ops::Parts;

/// Return a topologically valid equivalent of `geom`.
pub fn repair(geom: &Geometry<f64>) -> Geometry<f64> {
    let mut parts = Parts::of(geom);

    if !parts.polygons.is_empty() {
        parts.polygons = repair_polygons(std::mem::take(&mut parts.polygons));
    }

    parts.lines = parts.lines.into_iter().filter_map(repair_line).collect();
    parts.points.retain(|p| p.x().is_finite() && p.y().is_finite());

    parts.into_geometry()
}

/// Union the polygons one at a time so overlapping members of an invalid
/// multipolygon merge instead of cancelling under the even-odd fill rule.
fn repair_polygons(polygons: Vec<Polygon<f64>>) -> Vec<Polygon<f64>> {
    polygons
        .into_iter()
        .fold(MultiPolygon::new(Vec::new()), |acc, poly| {
            acc.union(&MultiPolygon::new(vec![poly]))
        })
        .0
}

fn repair_line(line: LineString<f64>) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(line.0.len());
    for c in line.0 {
        if !(c.x.is_finite() && c.y.is_finite()) {
            continue;
        }
        if coords.last() != Some(&c) {
            coords.push(c);
        }
    }
    (coords.len() >= 2).then(|| LineString::new(coords))
}
