//! `rai-spatial` — geometry collections and the spatial overlay engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`frame`]       | `GeoFrame<T>`, `Record<T>`                                |
//! | [`index`]       | `BBoxIndex` (rstar R-tree over bounding boxes)            |
//! | [`ops`]         | dimension-aware `intersection` / `difference`             |
//! | [`repair`]      | `repair` (zero-width buffer semantics)                    |
//! | [`overlay`]     | `spatial_overlays`, `OverlayMode`, `Joined`, `Overlay`    |
//! | [`explode`]     | `explode`, `Part<T>`                                      |
//! | [`project`]     | `Projection`, `reproject`, `utm_crs_for`                  |
//! | [`buffer`]      | `create_buffer`                                           |
//! | [`conditional`] | `geom_within_country`, `delete_roads_urb`, frame wrappers |
//! | [`error`]       | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                        |
//! |------------|---------------------------------------------------------------|
//! | `parallel` | Per-record overlay and conditional transforms run on Rayon.   |

pub mod buffer;
pub mod conditional;
pub mod error;
pub mod explode;
pub mod frame;
pub mod index;
pub mod ops;
pub mod overlay;
pub mod project;
pub mod repair;


pub use buffer::create_buffer;
pub use conditional::{clip_to_boundary, delete_roads_urb, geom_within_country, remove_overlap};
pub use error::{SpatialError, SpatialResult};
pub use explode::{explode, Part};
pub use frame::{GeoFrame, Record};
pub use index::BBoxIndex;
pub use overlay::{
    overlay_difference, overlay_intersection, spatial_overlays, Joined, Overlay, OverlayMode,
};
pub use project::{reproject, reproject_frame, utm_crs_for, Projection};
pub use repair::repair;
