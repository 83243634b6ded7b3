//! Pipeline configuration.
//!
//! # Directory layout
//!
//! Every country run resolves its files under one `base_path`:
//!
//! ```text
//! <base_path>/poly_files/<country>.poly        boundary polygon (input)
//! <base_path>/osm_country/<country>.osm.pbf    clipped OSM extract
//! <base_path>/country_data/<country>.shp       extracted line shapefile
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::PrepError;

// ── PrepConfig ────────────────────────────────────────────────────────────────

/// Top-level configuration for a country extraction run.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the pipeline.  Missing fields fall back to [`Default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrepConfig {
    /// Root of the `poly_files`, `osm_country` and `country_data` directories.
    pub base_path: PathBuf,

    /// Continental (or planet) `.osm.pbf` archive the country is clipped from.
    pub continent_osm: PathBuf,

    /// Re-run the shapefile extraction even if the shapefile already exists.
    pub overwrite: bool,

    /// RAI mode: skip the per-segment length computation and length filter.
    pub rai: bool,

    /// Road tags must occur more than this many times to be kept (the four
    /// trunk classes are always kept).  Default: 20.
    pub min_tag_count: usize,

    /// Segments at or above this geodesic length (km) are dropped.  Default: 500.
    pub max_segment_km: f64,

    /// Sleep (seconds) before each re-read of a freshly extracted shapefile.
    /// Default `[30, 60]`: three attempts in total.
    pub retry_delays_secs: Vec<u64>,

    /// Name or path of the `osmconvert` executable.
    pub osmconvert_bin: String,

    /// Name or path of the `ogr2ogr` executable.
    pub ogr2ogr_bin: String,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            base_path:         PathBuf::from("."),
            continent_osm:     PathBuf::new(),
            overwrite:         false,
            rai:               false,
            min_tag_count:     20,
            max_segment_km:    500.0,
            retry_delays_secs: vec![30, 60],
            osmconvert_bin:    "osmconvert64".to_string(),
            ogr2ogr_bin:       "ogr2ogr".to_string(),
        }
    }
}

impl PrepConfig {
    /// Reject settings that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), PrepError> {
        if !(self.max_segment_km > 0.0) {
            return Err(PrepError::Config(format!(
                "max_segment_km must be positive, got {}",
                self.max_segment_km
            )));
        }
        if self.osmconvert_bin.trim().is_empty() {
            return Err(PrepError::Config("osmconvert_bin is empty".into()));
        }
        if self.ogr2ogr_bin.trim().is_empty() {
            return Err(PrepError::Config("ogr2ogr_bin is empty".into()));
        }
        Ok(())
    }

    /// Retry schedule as `Duration`s.
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_secs.iter().map(|&s| Duration::from_secs(s)).collect()
    }

    /// Resolve the file locations for `country` under [`base_path`](Self::base_path).
    pub fn country_paths(&self, country: &str) -> CountryPaths {
        CountryPaths::new(&self.base_path, country)
    }
}

// ── CountryPaths ──────────────────────────────────────────────────────────────

/// File locations for one country run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryPaths {
    /// `<base>/poly_files/<country>.poly`
    pub poly: PathBuf,
    /// `<base>/osm_country/<country>.osm.pbf`
    pub pbf: PathBuf,
    /// `<base>/country_data/<country>.shp`
    pub shp: PathBuf,
}

impl CountryPaths {
    pub fn new(base: &Path, country: &str) -> Self {
        Self {
            poly: base.join("poly_files").join(format!("{country}.poly")),
            pbf:  base.join("osm_country").join(format!("{country}.osm.pbf")),
            shp:  base.join("country_data").join(format!("{country}.shp")),
        }
    }
}
