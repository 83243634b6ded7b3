//! Index-accelerated overlay of two geometry collections.
//!
//! # Algorithm
//!
//! Both inputs are repaired on private copies.  An R-tree is bulk-loaded over
//! the right-hand geometries, and each left-hand geometry queries it with its
//! bounding box.  Only those candidate pairs reach the exact (and expensive)
//! boolean operation:
//!
//! ```text
//! intersection:  for i in left, for j in candidates(i):  repair(left[i] ∩ right[j])
//! difference:    for i in left:  fold(left[i], candidates(i), |acc, j| repair(acc − right[j]))
//! ```
//!
//! Records whose result is empty (boxes touched, shapes did not) are dropped.
//!
//! # Output schema
//!
//! Intersection merges both inputs into [`Joined<A, B>`]: `left` holds the
//! left record's attributes, `right` the right record's, and the two ids give
//! provenance.  Difference keeps the left record unchanged except for its
//! geometry.
//!
//! # Ordering
//!
//! Output follows left order, then ascending right position among the
//! candidates.  The `parallel` feature evaluates records on Rayon without
//! changing that order.

use std::fmt;
use std::str::FromStr;

use geo::{Geometry, HasDimensions};
use tracing::debug;

use rai_core::RowId;

use crate::frame::{ordinal_id, GeoFrame, Record};
use crate::index::BBoxIndex;
use crate::ops;
use crate::repair::repair;
use crate::{SpatialError, SpatialResult};

// ── OverlayMode ───────────────────────────────────────────────────────────────

/// Which overlay to compute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverlayMode {
    /// Pairwise intersection; attributes of both sides are merged.
    Intersection,
    /// Erase the right collection from each left record.
    Difference,
}

impl FromStr for OverlayMode {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intersection" => Ok(OverlayMode::Intersection),
            "difference"   => Ok(OverlayMode::Difference),
            other          => Err(SpatialError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for OverlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayMode::Intersection => f.write_str("intersection"),
            OverlayMode::Difference   => f.write_str("difference"),
        }
    }
}

// ── Result types ──────────────────────────────────────────────────────────────

/// Attributes of one intersection record: both parents and their ids.
#[derive(Clone, Debug, PartialEq)]
pub struct Joined<A, B> {
    pub left_id:  RowId,
    pub right_id: RowId,
    pub left:     A,
    pub right:    B,
}

/// Output of [`spatial_overlays`]; the variant matches the requested mode.
#[derive(Clone, Debug)]
pub enum Overlay<A, B> {
    Intersection(GeoFrame<Joined<A, B>>),
    Difference(GeoFrame<A>),
}

impl<A, B> Overlay<A, B> {
    pub fn len(&self) -> usize {
        match self {
            Overlay::Intersection(f) => f.len(),
            Overlay::Difference(f)   => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Result geometries in output order.
    pub fn geometries(&self) -> Vec<&Geometry<f64>> {
        match self {
            Overlay::Intersection(f) => f.geometries().collect(),
            Overlay::Difference(f)   => f.geometries().collect(),
        }
    }

    pub fn into_intersection(self) -> Option<GeoFrame<Joined<A, B>>> {
        match self {
            Overlay::Intersection(f) => Some(f),
            Overlay::Difference(_)   => None,
        }
    }

    pub fn into_difference(self) -> Option<GeoFrame<A>> {
        match self {
            Overlay::Difference(f)   => Some(f),
            Overlay::Intersection(_) => None,
        }
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Overlay `left` with `right`.
///
/// Neither input is modified.
///
/// # Errors
///
/// - [`SpatialError::EmptyInput`] if either collection has no records.
/// - [`SpatialError::CrsMismatch`] if the collections disagree on CRS.
pub fn spatial_overlays<A, B>(
    left: &GeoFrame<A>,
    right: &GeoFrame<B>,
    mode: OverlayMode,
) -> SpatialResult<Overlay<A, B>>
where
    A: Clone + Send + Sync,
    B: Clone + Send + Sync,
{
    match mode {
        OverlayMode::Intersection => overlay_intersection(left, right).map(Overlay::Intersection),
        OverlayMode::Difference   => overlay_difference(left, right).map(Overlay::Difference),
    }
}

/// Pairwise intersection of every left record with every right record whose
/// bounding box it touches.
///
/// Output ids are candidate-pair ordinals: unique, increasing, and with gaps
/// where empty intersections were dropped.  More candidate pairs than the id
/// space holds is [`SpatialError::IdsExhausted`].
pub fn overlay_intersection<A, B>(
    left: &GeoFrame<A>,
    right: &GeoFrame<B>,
) -> SpatialResult<GeoFrame<Joined<A, B>>>
where
    A: Clone + Send + Sync,
    B: Clone + Send + Sync,
{
    check_inputs(left, right)?;

    let left_geoms  = map_records(left.records(), |r| repair(&r.geometry));
    let right_geoms = map_records(right.records(), |r| repair(&r.geometry));
    let index = BBoxIndex::build(&right_geoms);

    let pairs: Vec<(usize, usize)> = left_geoms
        .iter()
        .enumerate()
        .flat_map(|(i, g)| index.candidates_for(g).into_iter().map(move |j| (i, j)))
        .collect();

    let computed = map_records(&pairs, |&(i, j)| {
        repair(&ops::intersection(&left_geoms[i], &right_geoms[j]))
    });

    let left_records  = left.records();
    let right_records = right.records();
    let records: Vec<Record<Joined<A, B>>> = pairs
        .iter()
        .zip(computed)
        .enumerate()
        .filter(|(_, (_, geom))| !geom.is_empty())
        .map(|(k, (&(i, j), geometry))| -> SpatialResult<Record<Joined<A, B>>> {
            let (l, r) = (&left_records[i], &right_records[j]);
            Ok(Record {
                id: ordinal_id(k)?,
                geometry,
                attrs: Joined {
                    left_id:  l.id,
                    right_id: r.id,
                    left:     l.attrs.clone(),
                    right:    r.attrs.clone(),
                },
            })
        })
        .collect::<SpatialResult<_>>()?;

    debug!(
        left = left.len(),
        right = right.len(),
        candidates = pairs.len(),
        kept = records.len(),
        "overlay intersection"
    );
    Ok(GeoFrame::from_unique(left.crs(), records))
}

/// Erase every right geometry from the left records it may overlap.
///
/// Left records with no candidates pass through (repaired); records erased
/// entirely are dropped.  Ids and attributes are the left record's.
pub fn overlay_difference<A, B>(
    left: &GeoFrame<A>,
    right: &GeoFrame<B>,
) -> SpatialResult<GeoFrame<A>>
where
    A: Clone + Send + Sync,
    B: Sync,
{
    check_inputs(left, right)?;

    let right_geoms = map_records(right.records(), |r| repair(&r.geometry));
    let index = BBoxIndex::build(&right_geoms);

    let erased = map_records(left.records(), |r| {
        let start = repair(&r.geometry);
        index
            .candidates_for(&start)
            .into_iter()
            .fold(start, |acc, j| repair(&ops::difference(&acc, &right_geoms[j])))
    });

    let records: Vec<Record<A>> = left
        .iter()
        .zip(erased)
        .filter(|(_, geom)| !geom.is_empty())
        .map(|(r, geometry)| Record { id: r.id, geometry, attrs: r.attrs.clone() })
        .collect();

    debug!(
        left = left.len(),
        right = right.len(),
        kept = records.len(),
        "overlay difference"
    );
    Ok(GeoFrame::from_unique(left.crs(), records))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_inputs<A, B>(left: &GeoFrame<A>, right: &GeoFrame<B>) -> SpatialResult<()> {
    if left.is_empty() {
        return Err(SpatialError::EmptyInput("left"));
    }
    if right.is_empty() {
        return Err(SpatialError::EmptyInput("right"));
    }
    if left.crs() != right.crs() {
        return Err(SpatialError::CrsMismatch { left: left.crs(), right: right.crs() });
    }
    Ok(())
}

/// Apply `f` to every item, in order; on Rayon's pool with `parallel`.
pub(crate) fn map_records<I, O, F>(items: &[I], f: F) -> Vec<O>
where
    I: Sync,
    O: Send,
    F: Fn(&I) -> O + Send + Sync,
{
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(f).collect()
    }
}
