//! `rai-osm` — OSM road extraction and classification for one country.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`classify`] | `RoadClass`, `classify` (closed reclassification table)         |
//! | [`length`]   | `line_length` (WGS84 geodesic, km)                              |
//! | [`tools`]    | `ExternalTools`: `clip_osm`, `extract_osm`, `extract_osm_rail`  |
//! | [`reader`]   | `FeatureSource`, `read_with_retry`, `ShapefileSource`           |
//! | [`country`]  | `get_country` and its filter / classify stages                  |
//! | [`summary`]  | per-class summary rows and CSV output                           |
//! | [`error`]    | `OsmError`, `OsmResult<T>`                                      |
//!
//! # Feature flags
//!
//! | Flag        | Effect                                                   |
//! |-------------|----------------------------------------------------------|
//! | `shapefile` | Enables `ShapefileSource` (reads `ogr2ogr` output).      |
//! | `parallel`  | Forwards to `rai-spatial/parallel`.                      |

pub mod classify;
pub mod country;
pub mod error;
pub mod length;
pub mod reader;
pub mod summary;
pub mod tools;

#[cfg(test)]
mod tests;

pub use classify::{classify, RoadClass, KNOWN_TAGS};
pub use country::{
    filter_by_length, filter_common_tags, get_country, map_roads, MeasuredRoad, Road, RoadTag,
    ALWAYS_KEPT,
};
pub use error::{OsmError, OsmResult};
pub use length::line_length;
pub use reader::{read_with_retry, FeatureSource};
#[cfg(feature = "shapefile")]
pub use reader::ShapefileSource;
pub use summary::{summarize, write_summary_csv, RoadSummaryRow};
pub use tools::{ogr2ogr_args, ExternalTools, LineKind};
