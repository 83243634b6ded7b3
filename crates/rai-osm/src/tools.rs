//! Wrappers around the external OSM command-line tools.
//!
//! | Operation          | Tool         | Produces                              |
//! |--------------------|--------------|---------------------------------------|
//! | `clip_osm`         | `osmconvert` | country `.osm.pbf` cut from a continent |
//! | `extract_osm`      | `ogr2ogr`    | shapefile of `highway` lines          |
//! | `extract_osm_rail` | `ogr2ogr`    | shapefile of `railway` lines          |
//!
//! Arguments are passed as a list, never through a shell, and a non-zero exit
//! status is an error.  Calls block until the tool finishes.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use rai_core::PrepConfig;

use crate::{OsmError, OsmResult};

/// Which OSM line layer to extract.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    Highway,
    Railway,
}

impl LineKind {
    /// OSM attribute selected from the `lines` layer.
    pub fn attribute(self) -> &'static str {
        match self {
            LineKind::Highway => "highway",
            LineKind::Railway => "railway",
        }
    }
}

/// Locations of the external executables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalTools {
    pub osmconvert: String,
    pub ogr2ogr:    String,
}

impl Default for ExternalTools {
    fn default() -> Self {
        Self { osmconvert: "osmconvert64".to_string(), ogr2ogr: "ogr2ogr".to_string() }
    }
}

impl ExternalTools {
    pub fn from_config(config: &PrepConfig) -> Self {
        Self {
            osmconvert: config.osmconvert_bin.clone(),
            ogr2ogr:    config.ogr2ogr_bin.clone(),
        }
    }

    /// Clip `continent_pbf` to the `.poly` boundary, keeping ways that cross it whole.
    pub fn clip_osm(&self, continent_pbf: &Path, country_poly: &Path, country_pbf: &Path) -> OsmResult<()> {
        info!(continent = %continent_pbf.display(), out = %country_pbf.display(), "clipping OSM extract");
        let mut cmd = Command::new(&self.osmconvert);
        cmd.arg(continent_pbf)
            .arg(prefixed("-B=", country_poly))
            .arg("--complete-ways")
            .arg(prefixed("-o=", country_pbf));
        run(&self.osmconvert, cmd)
    }

    /// Extract all `highway` lines from `country_pbf` into `country_shp`.
    pub fn extract_osm(&self, country_shp: &Path, country_pbf: &Path) -> OsmResult<()> {
        self.extract_lines(LineKind::Highway, country_shp, country_pbf)
    }

    /// Extract all `railway` lines from `country_pbf` into `country_shp`.
    pub fn extract_osm_rail(&self, country_shp: &Path, country_pbf: &Path) -> OsmResult<()> {
        self.extract_lines(LineKind::Railway, country_shp, country_pbf)
    }

    pub fn extract_lines(&self, kind: LineKind, country_shp: &Path, country_pbf: &Path) -> OsmResult<()> {
        info!(kind = kind.attribute(), out = %country_shp.display(), "extracting lines");
        let mut cmd = Command::new(&self.ogr2ogr);
        cmd.args(ogr2ogr_args(kind)).arg(country_shp).arg(country_pbf);
        run(&self.ogr2ogr, cmd)
    }
}

/// Fixed `ogr2ogr` options preceding the destination and source paths.
pub fn ogr2ogr_args(kind: LineKind) -> Vec<String> {
    let attr = kind.attribute();
    vec![
        "-overwrite".into(),
        "-skipfailures".into(),
        "-f".into(),
        "ESRI Shapefile".into(),
        "-progress".into(),
        "-sql".into(),
        format!("SELECT {attr} FROM lines WHERE {attr} IS NOT NULL"),
        "-lco".into(),
        "ENCODING=UTF-8".into(),
    ]
}

fn prefixed(flag: &str, path: &Path) -> std::ffi::OsString {
    let mut s = std::ffi::OsString::from(flag);
    s.push(path.as_os_str());
    s
}

fn run(tool: &str, mut cmd: Command) -> OsmResult<()> {
    debug!(tool, args = ?cmd.get_args().map(OsStr::to_string_lossy).collect::<Vec<_>>(), "spawning");
    let status = cmd
        .status()
        .map_err(|source| OsmError::ToolSpawn { tool: tool.to_string(), source })?;
    if status.success() {
        Ok(())
    } else {
        Err(OsmError::ToolFailed { tool: tool.to_string(), status })
    }
}
