//! Per-country road extraction pipeline.
//!
//! ```text
//! continent.osm.pbf ──clip_osm──▶ <c>.osm.pbf ──extract_osm──▶ <c>.shp
//!        ──read_with_retry──▶ GeoFrame<RoadTag>
//!        ──filter_common_tags──▶ ──filter_by_length──▶ GeoFrame<MeasuredRoad>
//!        ──map_roads──▶ GeoFrame<Road>
//! ```
//!
//! Clipping and extraction are skipped when their outputs already exist
//! (extraction re-runs when `overwrite` is set).  In RAI mode no lengths are
//! computed and nothing is dropped for length.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info;

use rai_core::PrepConfig;
use rai_spatial::GeoFrame;

use crate::classify::{classify, RoadClass};
use crate::length::line_length;
use crate::reader::{read_with_retry, FeatureSource};
use crate::tools::ExternalTools;
use crate::OsmResult;

/// Tags kept regardless of how often they occur.
pub const ALWAYS_KEPT: [&str; 4] = ["primary", "secondary", "trunk", "motorway"];

// ── Stage records ─────────────────────────────────────────────────────────────

/// A road line as read from the extract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadTag {
    pub highway: String,
}

/// A road line with its geodesic length, if computed.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredRoad {
    pub highway:     String,
    pub distance_km: Option<f64>,
}

/// A classified road line.
#[derive(Clone, Debug, PartialEq)]
pub struct Road {
    pub highway:     String,
    pub distance_km: Option<f64>,
    pub roads:       RoadClass,
}

// ── Stages ────────────────────────────────────────────────────────────────────

/// Keep records whose tag occurs more than `min_count` times, plus the
/// [`ALWAYS_KEPT`] trunk classes.
pub fn filter_common_tags(mut frame: GeoFrame<RoadTag>, min_count: usize) -> GeoFrame<RoadTag> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for r in &frame {
        *counts.entry(r.attrs.highway.as_str()).or_default() += 1;
    }
    let keep: FxHashSet<String> = counts
        .into_iter()
        .filter(|&(tag, n)| n > min_count || ALWAYS_KEPT.contains(&tag))
        .map(|(tag, _)| tag.to_string())
        .collect();
    frame.retain(|r| keep.contains(&r.attrs.highway));
    frame
}

/// Attach `distance_km` to every record and drop those at or above `max_km`.
pub fn filter_by_length(frame: GeoFrame<RoadTag>, max_km: f64) -> GeoFrame<MeasuredRoad> {
    let mut measured = frame.map_attrs(|geom, tag| MeasuredRoad {
        highway:     tag.highway,
        distance_km: Some(line_length(geom)),
    });
    measured.retain(|r| r.attrs.distance_km.is_some_and(|d| d < max_km));
    measured
}

/// Classify every record's tag.
///
/// # Errors
///
/// [`crate::OsmError::UnknownRoadTag`] on the first tag outside the table.
pub fn map_roads(frame: GeoFrame<MeasuredRoad>) -> OsmResult<GeoFrame<Road>> {
    frame.try_map_attrs(|_, m| {
        let roads = classify(&m.highway)?;
        Ok(Road { highway: m.highway, distance_km: m.distance_km, roads })
    })
}

/// Produce the classified road network of `country`.
///
/// Runs the external tools as needed, reads the extract through `source`
/// (retrying with `config.retry_delays()`), then filters and classifies.
pub fn get_country<S: FeatureSource + ?Sized>(
    config:  &PrepConfig,
    country: &str,
    tools:   &ExternalTools,
    source:  &S,
) -> OsmResult<GeoFrame<Road>> {
    config.validate()?;
    let paths = config.country_paths(country);

    if !paths.pbf.exists() {
        create_parent(&paths.pbf)?;
        tools.clip_osm(&config.continent_osm, &paths.poly, &paths.pbf)?;
    }
    if config.overwrite || !paths.shp.exists() {
        create_parent(&paths.shp)?;
        tools.extract_osm(&paths.shp, &paths.pbf)?;
    }

    let loaded = read_with_retry(source, &paths.shp, &config.retry_delays())?;
    let total = loaded.len();

    let common = filter_common_tags(loaded, config.min_tag_count);
    let kept_tags = common.len();

    let measured = if config.rai {
        common.map_attrs(|_, t| MeasuredRoad { highway: t.highway, distance_km: None })
    } else {
        filter_by_length(common, config.max_segment_km)
    };

    let roads = map_roads(measured)?;
    info!(country, total, kept_tags, kept = roads.len(), rai = config.rai, "country roads loaded");
    Ok(roads)
}

fn create_parent(path: &std::path::Path) -> OsmResult<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
