//! In-memory geometry collection.
//!
//! A [`GeoFrame<T>`] is an ordered list of [`Record<T>`]s sharing one
//! [`Crs`].  `T` is the statically-shaped attribute record of the current
//! pipeline stage; moving to the next stage is a typed projection
//! ([`map_attrs`](GeoFrame::map_attrs)) instead of column bookkeeping.
//!
//! Record ids are unique within a frame.  `push` hands out ids above every
//! id seen so far, and [`from_records`](GeoFrame::from_records) rejects
//! duplicates, so ids stay valid provenance keys after filtering.
//! [`RowId::INVALID`] is never a record id; once the id space below it is
//! used up, `push` fails instead of wrapping.

use std::collections::HashSet;

use geo::Geometry;

use rai_core::{Crs, RowId};

use crate::{SpatialError, SpatialResult};

/// One geometry with its identity and attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Record<T> {
    pub id:       RowId,
    pub geometry: Geometry<f64>,
    pub attrs:    T,
}

/// Ordered geometry collection with a shared CRS.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoFrame<T> {
    crs:     Crs,
    records: Vec<Record<T>>,
    next_id: u32,
}

impl<T> GeoFrame<T> {
    /// An empty frame in `crs`.
    pub fn new(crs: Crs) -> Self {
        Self { crs, records: Vec::new(), next_id: 0 }
    }

    /// Build from `(geometry, attrs)` rows, numbering them `0..n`.
    pub fn from_rows(
        crs: Crs,
        rows: impl IntoIterator<Item = (Geometry<f64>, T)>,
    ) -> SpatialResult<Self> {
        let mut frame = Self::new(crs);
        for (geometry, attrs) in rows {
            frame.push(geometry, attrs)?;
        }
        Ok(frame)
    }

    /// Build from records that already carry ids.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::InvalidId`] if a record carries [`RowId::INVALID`].
    /// - [`SpatialError::DuplicateId`] if two records share an id.
    pub fn from_records(crs: Crs, records: Vec<Record<T>>) -> SpatialResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut next_id = 0;
        for r in &records {
            if r.id == RowId::INVALID {
                return Err(SpatialError::InvalidId(r.id));
            }
            if !seen.insert(r.id) {
                return Err(SpatialError::DuplicateId(r.id));
            }
            next_id = next_id.max(r.id.0 + 1);
        }
        Ok(Self { crs, records, next_id })
    }

    /// Crate-internal constructor for outputs whose ids are unique by construction.
    pub(crate) fn from_unique(crs: Crs, records: Vec<Record<T>>) -> Self {
        let next_id = records.iter().map(|r| r.id.0.saturating_add(1)).max().unwrap_or(0);
        Self { crs, records, next_id }
    }

    /// Append a record and return its freshly assigned id.
    ///
    /// # Errors
    ///
    /// [`SpatialError::IdsExhausted`] when the next id would be [`RowId::INVALID`].
    pub fn push(&mut self, geometry: Geometry<f64>, attrs: T) -> SpatialResult<RowId> {
        let id = ordinal_id(self.next_id as usize)?;
        self.next_id += 1;
        self.records.push(Record { id, geometry, attrs });
        Ok(id)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record<T>] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<T>> {
        self.records.iter()
    }

    pub fn geometries(&self) -> impl Iterator<Item = &Geometry<f64>> + '_ {
        self.records.iter().map(|r| &r.geometry)
    }

    /// Look up a record by id.  Linear scan.
    pub fn get(&self, id: RowId) -> Option<&Record<T>> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn into_records(self) -> Vec<Record<T>> {
        self.records
    }

    // ── Stage transforms ──────────────────────────────────────────────────

    /// Keep only the records for which `keep` returns `true`.  Ids are preserved.
    pub fn retain(&mut self, keep: impl FnMut(&Record<T>) -> bool) {
        self.records.retain(keep);
    }

    /// Project every record's attributes into the next stage's type.
    pub fn map_attrs<U>(self, mut f: impl FnMut(&Geometry<f64>, T) -> U) -> GeoFrame<U> {
        let records = self
            .records
            .into_iter()
            .map(|r| {
                let attrs = f(&r.geometry, r.attrs);
                Record { id: r.id, geometry: r.geometry, attrs }
            })
            .collect();
        GeoFrame { crs: self.crs, records, next_id: self.next_id }
    }

    /// Fallible [`map_attrs`](Self::map_attrs); stops at the first error.
    pub fn try_map_attrs<U, E>(
        self,
        mut f: impl FnMut(&Geometry<f64>, T) -> Result<U, E>,
    ) -> Result<GeoFrame<U>, E> {
        let mut records = Vec::with_capacity(self.records.len());
        for r in self.records {
            let attrs = f(&r.geometry, r.attrs)?;
            records.push(Record { id: r.id, geometry: r.geometry, attrs });
        }
        Ok(GeoFrame { crs: self.crs, records, next_id: self.next_id })
    }

    /// Replace every geometry, keeping ids and attributes.
    pub fn map_geometry(mut self, mut f: impl FnMut(&Geometry<f64>) -> Geometry<f64>) -> Self {
        for r in &mut self.records {
            r.geometry = f(&r.geometry);
        }
        self
    }

    /// Swap in one new geometry per record, in record order.
    pub(crate) fn replace_geometries(mut self, geoms: Vec<Geometry<f64>>) -> Self {
        debug_assert_eq!(geoms.len(), self.records.len());
        for (r, g) in self.records.iter_mut().zip(geoms) {
            r.geometry = g;
        }
        self
    }

    /// Same records relabelled with a different CRS.  Coordinates are untouched;
    /// use [`crate::project::reproject_frame`] to transform them.
    pub(crate) fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }
}

/// Id for the `k`-th generated record.  Fails past the last usable id.
pub(crate) fn ordinal_id(k: usize) -> SpatialResult<RowId> {
    RowId::try_from(k)
        .ok()
        .filter(|&id| id != RowId::INVALID)
        .ok_or(SpatialError::IdsExhausted)
}

impl<'a, T> IntoIterator for &'a GeoFrame<T> {
    type Item = &'a Record<T>;
    type IntoIter = std::slice::Iter<'a, Record<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
