//! Pairwise boolean operations on arbitrary geometries.
//!
//! `geo` offers polygon booleans and polygon/line clipping but no single
//! "intersect anything with anything".  These helpers split each operand
//! into its puntal, lineal and areal parts, combine the parts per
//! dimension, and reassemble the result:
//!
//! | Left \ Right | points        | lines                  | polygons            |
//! |--------------|---------------|------------------------|---------------------|
//! | points       | coincidence   | point-on-line          | point-in-polygon    |
//! | lines        | point-on-line | crossings + overlaps   | clip (inside)       |
//! | polygons     | point-in-poly | clip (inside)          | boolean op          |
//!
//! For difference only the left operand's parts survive.  Removing a
//! lower-dimensional set (points, lines) from an area leaves it unchanged;
//! removing lines from lines cuts out their collinear overlaps.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{
    BooleanOps, BoundingRect, Coord, Geometry, GeometryCollection, HasDimensions, Intersects,
    LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

// ── Dimensional decomposition ─────────────────────────────────────────────────

/// A geometry split by dimension.
#[derive(Clone, Debug, Default)]
pub(crate) struct Parts {
    pub points:   Vec<Point<f64>>,
    pub lines:    Vec<LineString<f64>>,
    pub polygons: Vec<Polygon<f64>>,
}

impl Parts {
    pub fn of(geom: &Geometry<f64>) -> Self {
        let mut parts = Parts::default();
        parts.collect(geom);
        parts
    }

    fn collect(&mut self, geom: &Geometry<f64>) {
        match geom {
            Geometry::Point(p)              => self.points.push(*p),
            Geometry::MultiPoint(mp)        => self.points.extend(mp.iter().copied()),
            Geometry::Line(l)               => self.lines.push(LineString::from(*l)),
            Geometry::LineString(ls)        => self.lines.push(ls.clone()),
            Geometry::MultiLineString(mls)  => self.lines.extend(mls.iter().cloned()),
            Geometry::Polygon(p)            => self.polygons.push(p.clone()),
            Geometry::MultiPolygon(mp)      => self.polygons.extend(mp.iter().cloned()),
            Geometry::Rect(r)               => self.polygons.push(r.to_polygon()),
            Geometry::Triangle(t)           => self.polygons.push(t.to_polygon()),
            Geometry::GeometryCollection(gc) => gc.iter().for_each(|g| self.collect(g)),
        }
    }

    pub fn multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons.clone())
    }

    pub fn multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.lines.clone())
    }

    /// Reassemble.  A single non-empty dimension becomes the matching `Multi*`
    /// geometry; mixed dimensions become a collection; nothing becomes an
    /// empty collection.
    pub fn into_geometry(self) -> Geometry<f64> {
        let mut members: Vec<Geometry<f64>> = Vec::with_capacity(3);
        if !self.points.is_empty() {
            members.push(MultiPoint::new(self.points).into());
        }
        if !self.lines.is_empty() {
            members.push(MultiLineString::new(self.lines).into());
        }
        if !self.polygons.is_empty() {
            members.push(MultiPolygon::new(self.polygons).into());
        }
        match members.len() {
            1 => members.remove(0),
            _ => Geometry::GeometryCollection(GeometryCollection::new_from(members)),
        }
    }
}

// ── Public operations ─────────────────────────────────────────────────────────

/// The point set shared by `a` and `b`.
pub fn intersection(a: &Geometry<f64>, b: &Geometry<f64>) -> Geometry<f64> {
    if a.is_empty() || b.is_empty() || !boxes_touch(a, b) {
        return empty();
    }
    let pa = Parts::of(a);
    let pb = Parts::of(b);
    let mut out = Parts::default();

    // areal × areal
    if !pa.polygons.is_empty() && !pb.polygons.is_empty() {
        out.polygons = pa.multi_polygon().intersection(&pb.multi_polygon()).0;
    }

    // lineal × areal, both directions
    if !pa.lines.is_empty() && !pb.polygons.is_empty() {
        out.lines.extend(pb.multi_polygon().clip(&pa.multi_line_string(), false).0);
    }
    if !pb.lines.is_empty() && !pa.polygons.is_empty() {
        out.lines.extend(pa.multi_polygon().clip(&pb.multi_line_string(), false).0);
    }

    // lineal × lineal
    if !pa.lines.is_empty() && !pb.lines.is_empty() {
        let (points, overlaps) = line_crossings(&pa.lines, &pb.lines);
        out.points.extend(points);
        out.lines.extend(overlaps);
    }

    // puntal × anything
    out.points.extend(pa.points.iter().filter(|p| p.intersects(b)).copied());
    out.points.extend(pb.points.iter().filter(|p| p.intersects(a)).copied());
    dedup_points(&mut out.points);
    out.lines.retain(|ls| ls.0.len() >= 2);

    out.into_geometry()
}

/// The part of `a` not covered by `b`.
pub fn difference(a: &Geometry<f64>, b: &Geometry<f64>) -> Geometry<f64> {
    if a.is_empty() {
        return empty();
    }
    if b.is_empty() || !boxes_touch(a, b) {
        return a.clone();
    }
    let pa = Parts::of(a);
    let pb = Parts::of(b);
    let mut out = Parts::default();

    if !pa.polygons.is_empty() {
        out.polygons = if pb.polygons.is_empty() {
            pa.polygons.clone()
        } else {
            pa.multi_polygon().difference(&pb.multi_polygon()).0
        };
    }

    if !pa.lines.is_empty() {
        let mut lines = if pb.polygons.is_empty() {
            pa.lines.clone()
        } else {
            pb.multi_polygon().clip(&pa.multi_line_string(), true).0
        };
        if !pb.lines.is_empty() {
            lines = subtract_lines(&lines, &pb.lines);
        }
        lines.retain(|ls| ls.0.len() >= 2);
        out.lines = lines;
    }

    out.points = pa.points.iter().filter(|p| !p.intersects(b)).copied().collect();

    out.into_geometry()
}

/// The canonical empty result.
pub fn empty() -> Geometry<f64> {
    Geometry::GeometryCollection(GeometryCollection::default())
}

// ── Internals ─────────────────────────────────────────────────────────────────

fn boxes_touch(a: &Geometry<f64>, b: &Geometry<f64>) -> bool {
    match (a.bounding_rect(), b.bounding_rect()) {
        (Some(ra), Some(rb)) => ra.intersects(&rb),
        _ => false,
    }
}

/// Segment-by-segment crossings of two line sets.
///
/// Returns isolated crossing points and collinear overlaps.  Quadratic in the
/// segment count, with a bounding-box reject per string pair.
fn line_crossings(
    left: &[LineString<f64>],
    right: &[LineString<f64>],
) -> (Vec<Point<f64>>, Vec<LineString<f64>>) {
    let mut points = Vec::new();
    let mut overlaps = Vec::new();

    for la in left {
        let Some(ra) = la.bounding_rect() else { continue };
        for lb in right {
            match lb.bounding_rect() {
                Some(rb) if ra.intersects(&rb) => {}
                _ => continue,
            }
            for sa in la.lines() {
                for sb in lb.lines() {
                    match line_intersection(sa, sb) {
                        Some(LineIntersection::SinglePoint { intersection, .. }) => {
                            points.push(Point::from(intersection));
                        }
                        Some(LineIntersection::Collinear { intersection }) => {
                            if intersection.start == intersection.end {
                                points.push(Point::from(intersection.start));
                            } else {
                                overlaps.push(LineString::new(vec![
                                    intersection.start,
                                    intersection.end,
                                ]));
                            }
                        }
                        None => {}
                    }
                }
            }
        }
    }

    // A crossing that lies on a collinear overlap is already covered by it.
    if !overlaps.is_empty() {
        let covered = Geometry::MultiLineString(MultiLineString::new(overlaps.clone()));
        points.retain(|p| !p.intersects(&covered));
    }
    (points, overlaps)
}

/// `left` with every stretch that runs collinear with some `right` segment cut out.
///
/// Each left segment is parameterised over `[0, 1]`; covered intervals are
/// merged and the uncovered remainder is re-chained into line strings, so a
/// string only splits where material was actually removed.
fn subtract_lines(left: &[LineString<f64>], right: &[LineString<f64>]) -> Vec<LineString<f64>> {
    const EPS: f64 = 1e-12;
    let mut out = Vec::new();

    for la in left {
        let Some(ra) = la.bounding_rect() else { continue };
        let nearby: Vec<&LineString<f64>> = right
            .iter()
            .filter(|lb| lb.bounding_rect().is_some_and(|rb| ra.intersects(&rb)))
            .collect();

        let mut chain: Vec<Coord<f64>> = Vec::new();
        for sa in la.lines() {
            let d = sa.delta();
            let len2 = d.x * d.x + d.y * d.y;
            if len2 == 0.0 {
                continue;
            }
            let param = |c: Coord<f64>| ((c.x - sa.start.x) * d.x + (c.y - sa.start.y) * d.y) / len2;
            let at = |t: f64| {
                if t <= 0.0 {
                    sa.start
                } else if t >= 1.0 {
                    sa.end
                } else {
                    sa.start + d * t
                }
            };

            let mut covered: Vec<(f64, f64)> = nearby
                .iter()
                .flat_map(|lb| lb.lines())
                .filter_map(|sb| match line_intersection(sa, sb) {
                    Some(LineIntersection::Collinear { intersection })
                        if intersection.start != intersection.end =>
                    {
                        let (t0, t1) = (param(intersection.start), param(intersection.end));
                        Some((t0.min(t1).max(0.0), t0.max(t1).min(1.0)))
                    }
                    _ => None,
                })
                .collect();
            covered.sort_by(|a, b| a.0.total_cmp(&b.0));

            // Walk [0, 1] and emit the gaps between covered intervals.
            let mut pieces = Vec::new();
            let mut cursor = 0.0;
            for (t0, t1) in covered {
                if t0 > cursor + EPS {
                    pieces.push((cursor, t0));
                }
                cursor = f64::max(cursor, t1);
            }
            if cursor < 1.0 - EPS {
                pieces.push((cursor, 1.0));
            }

            for (t0, t1) in pieces {
                let (c0, c1) = (at(t0), at(t1));
                if chain.last() == Some(&c0) {
                    chain.push(c1);
                } else {
                    flush(&mut chain, &mut out);
                    chain.extend([c0, c1]);
                }
            }
        }
        flush(&mut chain, &mut out);
    }
    out
}

fn flush(chain: &mut Vec<Coord<f64>>, out: &mut Vec<LineString<f64>>) {
    if chain.len() >= 2 {
        out.push(LineString::new(std::mem::take(chain)));
    } else {
        chain.clear();
    }
}

fn dedup_points(points: &mut Vec<Point<f64>>) {
    let mut seen: Vec<Coord<f64>> = Vec::with_capacity(points.len());
    points.retain(|p| {
        if seen.contains(&p.0) {
            false
        } else {
            seen.push(p.0);
            true
        }
    });
}
