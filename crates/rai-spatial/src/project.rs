//! Coordinate transformations between the supported CRSs.
//!
//! | CRS                  | Projection                                      |
//! |----------------------|-------------------------------------------------|
//! | EPSG:4326            | geographic lon/lat (identity)                   |
//! | EPSG:3857            | spherical Mercator, R = 6 378 137 m             |
//! | EPSG:326zz / 327zz   | transverse Mercator on WGS84, k0 = 0.9996       |
//!
//! The UTM series are the USGS (Snyder 1987) expansions: sub-millimetre
//! inside a zone, degrading slowly beyond ±3° of the central meridian.
//! Every transform goes through geographic coordinates.

use geo::{Coord, Geometry, MapCoords};

use rai_core::Crs;

use crate::frame::GeoFrame;
use crate::{SpatialError, SpatialResult};

// ── WGS84 ellipsoid ───────────────────────────────────────────────────────────

const A: f64 = 6_378_137.0;
const F: f64 = 1.0 / 298.257_223_563;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

// ── Projection ────────────────────────────────────────────────────────────────

/// A resolved, transformable CRS.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Projection {
    Geographic,
    WebMercator,
    Utm { zone: u8, north: bool },
}

impl Projection {
    /// # Errors
    ///
    /// [`SpatialError::UnsupportedCrs`] for codes outside the table above.
    pub fn from_crs(crs: Crs) -> SpatialResult<Self> {
        if crs == Crs::WGS84 {
            return Ok(Projection::Geographic);
        }
        if crs == Crs::WEB_MERCATOR {
            return Ok(Projection::WebMercator);
        }
        match crs.utm_zone() {
            Some((zone, north)) => Ok(Projection::Utm { zone, north }),
            None => Err(SpatialError::UnsupportedCrs(crs)),
        }
    }

    /// Geographic (x = lon°, y = lat°) → projected.
    pub fn forward(self, c: Coord<f64>) -> Coord<f64> {
        match self {
            Projection::Geographic => c,
            Projection::WebMercator => mercator_forward(c),
            Projection::Utm { zone, north } => tm_forward(c, central_meridian(zone), north),
        }
    }

    /// Projected → geographic (x = lon°, y = lat°).
    pub fn inverse(self, c: Coord<f64>) -> Coord<f64> {
        match self {
            Projection::Geographic => c,
            Projection::WebMercator => mercator_inverse(c),
            Projection::Utm { zone, north } => tm_inverse(c, central_meridian(zone), north),
        }
    }
}

/// The UTM CRS whose zone contains `(lon, lat)`.
pub fn utm_crs_for(lon: f64, lat: f64) -> Crs {
    let zone = (((lon + 180.0) / 6.0).floor() as i64).rem_euclid(60) + 1;
    let base = if lat >= 0.0 { 32_600 } else { 32_700 };
    Crs(base + zone as u32)
}

// ── Geometry / frame helpers ──────────────────────────────────────────────────

/// Transform every coordinate of `geom` from `from` to `to`.
pub fn reproject(geom: &Geometry<f64>, from: Crs, to: Crs) -> SpatialResult<Geometry<f64>> {
    if from == to {
        return Ok(geom.clone());
    }
    let src = Projection::from_crs(from)?;
    let dst = Projection::from_crs(to)?;
    Ok(geom.map_coords(|c| dst.forward(src.inverse(c))))
}

/// Transform a whole frame into `to`.  Ids and attributes are untouched.
pub fn reproject_frame<T>(frame: GeoFrame<T>, to: Crs) -> SpatialResult<GeoFrame<T>> {
    let from = frame.crs();
    if from == to {
        return Ok(frame);
    }
    let src = Projection::from_crs(from)?;
    let dst = Projection::from_crs(to)?;
    Ok(frame
        .map_geometry(|g| g.map_coords(|c| dst.forward(src.inverse(c))))
        .with_crs(to))
}

// ── Spherical Mercator ────────────────────────────────────────────────────────

fn mercator_forward(c: Coord<f64>) -> Coord<f64> {
    let lat = c.y.clamp(-85.051_128_78, 85.051_128_78).to_radians();
    Coord {
        x: A * c.x.to_radians(),
        y: A * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

fn mercator_inverse(c: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (c.x / A).to_degrees(),
        y: (2.0 * (c.y / A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees(),
    }
}

// ── Transverse Mercator (UTM) ─────────────────────────────────────────────────

fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// Squared first eccentricity.
#[inline]
fn e2() -> f64 {
    F * (2.0 - F)
}

/// Meridional arc length from the equator to latitude `phi` (radians).
fn meridian_arc(phi: f64) -> f64 {
    let e2 = e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

fn tm_forward(c: Coord<f64>, lon0: f64, north: bool) -> Coord<f64> {
    let e2 = e2();
    let ep2 = e2 / (1.0 - e2);

    let phi = c.y.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let cc = ep2 * cos_phi * cos_phi;
    let a = (c.x - lon0).to_radians() * cos_phi;
    let m = meridian_arc(phi);

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let x = FALSE_EASTING
        + K0 * n
            * (a + (1.0 - t + cc) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * cc - 58.0 * ep2) * a5 / 120.0);
    let mut y = K0
        * (m + n * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * cc + 4.0 * cc * cc) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * cc - 330.0 * ep2) * a6 / 720.0));
    if !north {
        y += FALSE_NORTHING_SOUTH;
    }
    Coord { x, y }
}

fn tm_inverse(c: Coord<f64>, lon0: f64, north: bool) -> Coord<f64> {
    let e2 = e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);
    let sqrt_1_e2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);

    let x = c.x - FALSE_EASTING;
    let y = if north { c.y } else { c.y - FALSE_NORTHING_SOUTH };

    let m = y / K0;
    let mu = m / (A * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    // Footpoint latitude.
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin1, cos1) = phi1.sin_cos();
    let tan1 = phi1.tan();
    let c1 = ep2 * cos1 * cos1;
    let t1 = tan1 * tan1;
    let w = 1.0 - e2 * sin1 * sin1;
    let n1 = A / w.sqrt();
    let r1 = A * (1.0 - e2) / (w * w.sqrt());
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let phi = phi1
        - (n1 * tan1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d6
                    / 720.0);
    let lambda = (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5 / 120.0)
        / cos1;

    Coord { x: lon0 + lambda.to_degrees(), y: phi.to_degrees() }
}
