//! OSM-pipeline error type.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use rai_core::PrepError;
use rai_spatial::SpatialError;

/// Errors produced by `rai-osm`.
#[derive(Debug, Error)]
pub enum OsmError {
    /// A `highway` value missing from the reclassification table.
    #[error("road tag {0:?} has no road class")]
    UnknownRoadTag(String),

    #[error("failed to start {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    ToolFailed { tool: String, status: ExitStatus },

    #[error("cannot read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] PrepError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type OsmResult<T> = Result<T, OsmError>;
