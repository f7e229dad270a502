//! Working frames: where rotation is a rigid Euclidean operation.
//!
//! Footprints in lon/lat degrees are projected to spherical Web Mercator
//! before classification and rotation, and mapped back afterwards. Planar
//! inputs pass through unchanged.

use std::f64::consts::FRAC_PI_4;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::{Point, Polygon};

/// WGS84 semi-major axis used by spherical Web Mercator (metres).
const EARTH_RADIUS_M: f64 = 6_378_137.0;
/// Latitude where the Web Mercator square ends.
const MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frame {
    /// Coordinates are already planar.
    #[default]
    Planar,
    /// `(lon, lat)` degrees, processed in spherical Web Mercator metres.
    WebMercator,
}

impl Frame {
    /// Input coordinates → working plane.
    pub fn forward(&self, p: Point) -> Point {
        match self {
            Frame::Planar => p,
            Frame::WebMercator => {
                let lat = p.y.clamp(-MAX_LAT_DEG, MAX_LAT_DEG).to_radians();
                Point::new(
                    EARTH_RADIUS_M * p.x.to_radians(),
                    EARTH_RADIUS_M * (FRAC_PI_4 + 0.5 * lat).tan().ln(),
                )
            }
        }
    }

    /// Working plane → input coordinates.
    pub fn inverse(&self, p: Point) -> Point {
        match self {
            Frame::Planar => p,
            Frame::WebMercator => Point::new(
                (p.x / EARTH_RADIUS_M).to_degrees(),
                (2.0 * (p.y / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees(),
            ),
        }
    }

    pub fn forward_polygon(&self, poly: &Polygon) -> Polygon {
        match self {
            Frame::Planar => poly.clone(),
            _ => poly.map_points(|p| self.forward(p)),
        }
    }

    pub fn inverse_polygon(&self, poly: &Polygon) -> Polygon {
        match self {
            Frame::Planar => poly.clone(),
            _ => poly.map_points(|p| self.inverse(p)),
        }
    }
}

impl FromStr for Frame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planar" => Ok(Frame::Planar),
            "web-mercator" | "webmercator" | "epsg:3857" => Ok(Frame::WebMercator),
            other => Err(format!(
                "unknown frame `{other}` (expected `planar` or `web-mercator`)"
            )),
        }
    }
}
