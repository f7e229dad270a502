//! Adapters between footprint types and `geo` types.
//!
//! `geo` supplies the boolean intersection used by the acceptance check and
//! the simplification used by batch drivers; footprints cross the boundary
//! here and are re-validated on the way back.

use geo::{Coord, LineString};

use super::types::{Point, Polygon, Ring, RingRole};
use crate::ortho::OrthoError;

pub fn ring_to_geo(ring: &Ring) -> LineString<f64> {
    LineString::from(
        ring.points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect::<Vec<_>>(),
    )
}

pub fn polygon_to_geo(poly: &Polygon) -> geo::Polygon<f64> {
    geo::Polygon::new(
        ring_to_geo(poly.exterior()),
        poly.interiors().iter().map(ring_to_geo).collect(),
    )
}

/// Re-validate a `geo` ring; open rings are closed first.
pub fn ring_from_geo(ls: &LineString<f64>, role: RingRole) -> Result<Ring, OrthoError> {
    let pts: Vec<Point> = ls.0.iter().map(|c| Point::new(c.x, c.y)).collect();
    Ring::from_open(pts).map_err(|e| e.in_ring(role))
}

pub fn polygon_from_geo(poly: &geo::Polygon<f64>) -> Result<Polygon, OrthoError> {
    let exterior = ring_from_geo(poly.exterior(), RingRole::Exterior)?;
    let interiors = poly
        .interiors()
        .iter()
        .enumerate()
        .map(|(k, ls)| ring_from_geo(ls, RingRole::Interior(k)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::from_rings(exterior, interiors))
}
