//! Bounding-box R-tree over the records of one frame.
//!
//! Built per overlay call and dropped with it.  Entries store the record's
//! **position** in the frame slice (not its `RowId`) so candidates can be used
//! to index straight back into the slice.  Empty geometries have no bounding
//! box and are never returned as candidates.

use geo::{BoundingRect, Geometry, Rect};
use rstar::{RTree, RTreeObject, AABB};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct BoxEntry {
    envelope: AABB<[f64; 2]>,
    pos:      usize,
}

impl RTreeObject for BoxEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Convert a `geo` rectangle to an rstar envelope.
#[inline]
pub fn rect_envelope(rect: Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

// ── BBoxIndex ─────────────────────────────────────────────────────────────────

/// Spatial index answering "which geometries have a bounding box touching
/// this one?".
pub struct BBoxIndex {
    tree: RTree<BoxEntry>,
}

impl BBoxIndex {
    /// Bulk-load an index over `geoms`; candidate positions refer to this order.
    pub fn build<'a>(geoms: impl IntoIterator<Item = &'a Geometry<f64>>) -> Self {
        let entries: Vec<BoxEntry> = geoms
            .into_iter()
            .enumerate()
            .filter_map(|(pos, g)| {
                g.bounding_rect().map(|rect| BoxEntry { envelope: rect_envelope(rect), pos })
            })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions whose boxes intersect (or touch) `rect`, ascending.
    pub fn candidates(&self, rect: Rect<f64>) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&rect_envelope(rect))
            .map(|e| e.pos)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Candidates for a geometry's bounding box; empty geometry → none.
    pub fn candidates_for(&self, geom: &Geometry<f64>) -> Vec<usize> {
        geom.bounding_rect().map(|r| self.candidates(r)).unwrap_or_default()
    }
}
