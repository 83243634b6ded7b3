//! Per-class summary of a classified road network.
//!
//! One CSV row per [`RoadClass`]: `roads,segments,total_km`.  `total_km` is
//! empty when lengths were not computed (RAI mode).

use std::path::Path;

use csv::Writer;

use rai_spatial::GeoFrame;

use crate::classify::RoadClass;
use crate::country::Road;
use crate::OsmResult;

/// Aggregate for one road class.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSummaryRow {
    pub roads:    RoadClass,
    pub segments: usize,
    /// Sum of `distance_km`, `None` if any segment of the class is unmeasured.
    pub total_km: Option<f64>,
}

/// Count segments and sum lengths per class.  Classes with no segments are omitted;
/// rows come out in [`RoadClass::ALL`] order.
pub fn summarize(frame: &GeoFrame<Road>) -> Vec<RoadSummaryRow> {
    RoadClass::ALL
        .iter()
        .filter_map(|&class| {
            let mut segments = 0;
            let mut total_km = Some(0.0);
            for r in frame.iter().filter(|r| r.attrs.roads == class) {
                segments += 1;
                total_km = total_km.zip(r.attrs.distance_km).map(|(t, d)| t + d);
            }
            (segments > 0).then_some(RoadSummaryRow { roads: class, segments, total_km })
        })
        .collect()
}

/// Write `rows` to `path` with a header row.
pub fn write_summary_csv(path: &Path, rows: &[RoadSummaryRow]) -> OsmResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["roads", "segments", "total_km"])?;
    for row in rows {
        w.write_record(&[
            row.roads.to_string(),
            row.segments.to_string(),
            row.total_km.map(|km| format!("{km:.3}")).unwrap_or_default(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
