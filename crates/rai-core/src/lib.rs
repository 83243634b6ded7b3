//! `rai-core` — foundational types for the `rai` road pre-processing toolkit.
//!
//! This crate is a dependency of every other `rai-*` crate.  It intentionally
//! has no `rai-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `RowId`                                                |
//! | [`crs`]      | `Crs` (EPSG-coded coordinate reference system)         |
//! | [`config`]   | `PrepConfig`, `CountryPaths`                           |
//! | [`error`]    | `PrepError`, `PrepResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod crs;
pub mod error;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CountryPaths, PrepConfig};
pub use crs::Crs;
pub use error::{PrepError, PrepResult};
pub use ids::RowId;
