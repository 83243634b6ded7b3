//! Aggregated road classes.
//!
//! OSM `highway=*` values are collapsed into five classes used by the
//! accessibility analysis.  The table is closed: a tag missing from it is an
//! error ([`classify`]), not a silent default.
//!
//! | Class       | Representative tags                                     |
//! |-------------|---------------------------------------------------------|
//! | `Primary`   | motorway, trunk, primary and their links                |
//! | `Secondary` | secondary, secondary_link, road                         |
//! | `Tertiary`  | tertiary, residential, service, unclassified, living_street |
//! | `Track`     | track, track_grade1..5, path, bridleway, construction   |
//! | `Other`     | footway, cycleway, steps, proposed, disused, …          |

use std::fmt;

use crate::{OsmError, OsmResult};

/// Aggregated road class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoadClass {
    Primary,
    Secondary,
    Tertiary,
    Track,
    Other,
}

impl RoadClass {
    pub const ALL: [RoadClass; 5] = [
        RoadClass::Primary,
        RoadClass::Secondary,
        RoadClass::Tertiary,
        RoadClass::Track,
        RoadClass::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Primary   => "primary",
            RoadClass::Secondary => "secondary",
            RoadClass::Tertiary  => "tertiary",
            RoadClass::Track     => "track",
            RoadClass::Other     => "other",
        }
    }

    /// Class for an OSM `highway` value, or `None` if the tag is not in the table.
    pub fn lookup(tag: &str) -> Option<RoadClass> {
        use RoadClass::*;
        let class = match tag {
            "primary" | "primary_link" | "trunk" | "trunk_link" | "motorway"
            | "motorway_link" => Primary,

            "secondary" | "secondary_link" | "road" => Secondary,

            "tertiary" | "tertiary_link" | "residential" | "service" | "unclassified"
            | "living_street" => Tertiary,

            "track" | "track_grade1" | "track_grade2" | "track_grade3" | "track_grade4"
            | "track_grade5" | "path" | "bridleway" | "construction" | "unsurfaced"
            | "services" | "corridor" | "escape" | "emergency_access_point"
            | "emergency_bay" => Track,

            "disused" | "dummy" | "planned" | "platform" | "traffic_island" | "razed"
            | "abandoned" | "proposed" | "bus_guideway" | "bus_stop" | "rest_area" | "yes"
            | "trail" | "raceway" | "cycleway" | "footway" | "pedestrian" | "steps"
            | "via_ferrata" | "elevator" | "crossing" | "seasonal" | "traffic_signals"
            | "piste" | "dismantled" | "winter_road" | "access" | "ohm:military:Trench"
            | "no" | "byway" | "unmarked_route" | "unknown" => Other,

            _ => return None,
        };
        Some(class)
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every tag the reclassification table knows, in table order.
pub const KNOWN_TAGS: [&str; 62] = [
    "disused", "dummy", "planned", "platform", "unsurfaced", "traffic_island", "razed",
    "abandoned", "services", "proposed", "corridor", "bus_guideway", "bus_stop", "rest_area",
    "yes", "trail", "escape", "raceway", "emergency_access_point", "emergency_bay",
    "construction", "bridleway", "cycleway", "footway", "living_street", "path", "pedestrian",
    "primary", "primary_link", "residential", "road", "secondary", "secondary_link", "service",
    "steps", "tertiary", "tertiary_link", "track", "unclassified", "trunk", "motorway",
    "trunk_link", "motorway_link", "via_ferrata", "elevator", "crossing", "seasonal",
    "traffic_signals", "piste", "dismantled", "winter_road", "access", "ohm:military:Trench",
    "no", "byway", "unmarked_route", "track_grade1", "track_grade2", "track_grade3",
    "track_grade4", "track_grade5", "unknown",
];

/// Class for `tag`.
///
/// # Errors
///
/// [`OsmError::UnknownRoadTag`] when the tag is not in the table.
pub fn classify(tag: &str) -> OsmResult<RoadClass> {
    RoadClass::lookup(tag).ok_or_else(|| OsmError::UnknownRoadTag(tag.to_string()))
}
