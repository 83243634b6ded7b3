//! Toolkit-wide error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `OsmError`) and
//! wrap `PrepError` where a core type is involved.

use thiserror::Error;

/// The error type for `rai-core`.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("CRS error: {0}")]
    Crs(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `rai-core`.
pub type PrepResult<T> = Result<T, PrepError>;
