//! Spatial-subsystem error type.

use thiserror::Error;

use rai_core::{Crs, PrepError, RowId};

/// Errors produced by `rai-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("CRS mismatch: left collection is {left}, right collection is {right}")]
    CrsMismatch { left: Crs, right: Crs },

    #[error("{0} collection is empty")]
    EmptyInput(&'static str),

    #[error("unsupported overlay mode {0:?} (expected \"intersection\" or \"difference\")")]
    UnsupportedMode(String),

    #[error("duplicate record id {0}")]
    DuplicateId(RowId),

    #[error("record id {0} is the reserved invalid id")]
    InvalidId(RowId),

    #[error("record ids exhausted")]
    IdsExhausted,

    #[error("{0} is geographic; buffering needs a projected CRS")]
    NotProjected(Crs),

    #[error("no transformation available for {0}")]
    UnsupportedCrs(Crs),

    #[error(transparent)]
    Core(#[from] PrepError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
