//! rai-prep — extract and classify the OSM road network of one country.
//!
//! ```text
//! rai-prep NLD --continent-osm europe-latest.osm.pbf --base-path data/ --summary nld.csv
//! ```
//!
//! Settings come from `--config <file.json>` (a serialized `PrepConfig`),
//! then command-line flags override individual fields.  Log verbosity follows
//! `RUST_LOG` and defaults to `info`.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rai_core::PrepConfig;
use rai_osm::{get_country, summarize, write_summary_csv, ExternalTools, ShapefileSource};

#[derive(Parser, Debug)]
#[command(name = "rai-prep", version, about = "Prepare one country's OSM roads for accessibility analysis")]
struct Args {
    /// Country code; names the `.poly`, `.osm.pbf` and `.shp` files.
    country: String,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Continental `.osm.pbf` to clip from.
    #[arg(long)]
    continent_osm: Option<PathBuf>,

    /// Directory holding `poly_files/`, `osm_country/` and `country_data/`.
    #[arg(long)]
    base_path: Option<PathBuf>,

    /// Re-extract the shapefile even if it exists.
    #[arg(long)]
    overwrite: bool,

    /// Skip segment lengths (RAI mode).
    #[arg(long)]
    rai: bool,

    /// Write a per-class summary CSV here.
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<PrepConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => PrepConfig::default(),
    };
    if let Some(p) = &args.continent_osm {
        config.continent_osm = p.clone();
    }
    if let Some(p) = &args.base_path {
        config.base_path = p.clone();
    }
    config.overwrite |= args.overwrite;
    config.rai |= args.rai;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(country = %args.country, base = %config.base_path.display(), "starting");

    let t0 = Instant::now();
    let tools = ExternalTools::from_config(&config);
    let roads = get_country(&config, &args.country, &tools, &ShapefileSource)
        .with_context(|| format!("preparing roads for {}", args.country))?;

    let rows = summarize(&roads);
    for row in &rows {
        info!(
            class = %row.roads,
            segments = row.segments,
            total_km = row.total_km.unwrap_or(f64::NAN),
            "summary"
        );
    }
    if let Some(path) = &args.summary {
        write_summary_csv(path, &rows)?;
        info!(path = %path.display(), "summary written");
    }

    info!(segments = roads.len(), elapsed_s = t0.elapsed().as_secs_f64(), "done");
    Ok(())
}
