//! Coordinate reference systems, identified by EPSG code.
//!
//! OSM data arrives in WGS84 (EPSG:4326, degrees).  Buffering and area
//! measurement need a projected system in metres; the toolkit supports Web
//! Mercator and the 120 WGS84 UTM zones.  Anything else can be named but
//! not transformed.

use std::fmt;
use std::str::FromStr;

use crate::PrepError;

/// An EPSG-coded coordinate reference system.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crs(pub u32);

impl Crs {
    /// WGS84 geographic coordinates, longitude/latitude in degrees.
    pub const WGS84: Crs = Crs(4326);

    /// Spherical ("Web") Mercator, metres.
    pub const WEB_MERCATOR: Crs = Crs(3857);

    #[inline]
    pub fn epsg(self) -> u32 {
        self.0
    }

    /// WGS84 / UTM zone `zone` (1–60) in the northern or southern hemisphere.
    pub fn utm(zone: u8, north: bool) -> Result<Crs, PrepError> {
        if !(1..=60).contains(&zone) {
            return Err(PrepError::Crs(format!("UTM zone {zone} outside 1..=60")));
        }
        let base = if north { 32_600 } else { 32_700 };
        Ok(Crs(base + zone as u32))
    }

    /// `(zone, north)` if this is a WGS84 UTM code.
    pub fn utm_zone(self) -> Option<(u8, bool)> {
        match self.0 {
            32_601..=32_660 => Some(((self.0 - 32_600) as u8, true)),
            32_701..=32_760 => Some(((self.0 - 32_700) as u8, false)),
            _ => None,
        }
    }

    /// `true` for angular (degree-based) systems.
    ///
    /// Only the geographic codes used by OSM tooling are recognized.
    pub fn is_geographic(self) -> bool {
        matches!(self.0, 4326 | 4269 | 4258)
    }
}

impl Default for Crs {
    fn default() -> Self {
        Crs::WGS84
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl FromStr for Crs {
    type Err = PrepError;

    /// Accepts `"EPSG:32637"`, `"epsg:32637"` or a bare `"32637"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let code = match s.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("epsg:") => &s[5..],
            _ => s,
        };
        code.parse::<u32>()
            .map(Crs)
            .map_err(|_| PrepError::Crs(format!("cannot parse CRS from {s:?}")))
    }
}
