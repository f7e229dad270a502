//! Acceptance check: keep the squared polygon only if it still resembles the original.
//!
//! Rule (per simple polygon part)
//! - No intersection with the original, or a collapsed ring: reject.
//! - Overlap ratio `area(orig ∩ new) / area(orig)` at or above `min_overlap`: accept.
//! - Otherwise accept only when the original was already near-rectilinear,
//!   i.e. its first-pass correction angles spread by at most `max_dispersion_deg`.

use std::fmt;

use geo::{Area, BooleanOps};
use serde::{Deserialize, Serialize};

use super::assemble::Assembled;
use super::bearing::classify;
use super::cfg::OrthoCfg;
use super::error::OrthoError;
use super::rotation::dispersion;
use crate::geom::convert::polygon_to_geo;
use crate::geom::{Polygon, RingRole};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Overlap at or above the threshold.
    Accepted,
    /// Low overlap, but the original was already close to rectilinear.
    NearRectilinear,
    /// Low overlap on a shape that was not rectilinear: rolled back.
    Distorted,
    /// The result does not intersect the original: rolled back.
    Disjoint,
    /// A ring collapsed while snapping: rolled back.
    Degenerate,
}

impl Verdict {
    #[inline]
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted | Verdict::NearRectilinear)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Accepted => "accepted",
            Verdict::NearRectilinear => "near-rectilinear",
            Verdict::Distorted => "distorted",
            Verdict::Disjoint => "disjoint",
            Verdict::Degenerate => "degenerate",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the acceptance check for one part.
#[derive(Clone, Debug, PartialEq)]
pub struct Assessment {
    pub verdict: Verdict,
    /// `area(orig ∩ new) / area(orig)`; 0 when disjoint or degenerate.
    pub overlap_ratio: f64,
    /// Spread of the original exterior's correction angles, computed only on low overlap.
    pub dispersion: Option<f64>,
    /// Rotation applied to each ring (degrees), exterior first.
    pub rotations: Vec<f64>,
}

/// `area(original ∩ candidate) / area(original)`, or `None` when they do not intersect.
pub fn overlap_ratio(original: &Polygon, candidate: &Polygon) -> Option<f64> {
    let a = polygon_to_geo(original);
    let base = a.unsigned_area();
    if !base.is_finite() || base <= 0.0 {
        return None;
    }
    let inter = a.intersection(&polygon_to_geo(candidate));
    if inter.0.is_empty() {
        return None;
    }
    Some(inter.unsigned_area() / base)
}

/// Decide from the overlap ratio and (lazily) the original's angular spread.
pub fn decide(
    overlap: Option<f64>,
    dispersion_of_original: impl FnOnce() -> Result<f64, OrthoError>,
    cfg: &OrthoCfg,
) -> Result<(Verdict, f64, Option<f64>), OrthoError> {
    let Some(ratio) = overlap else {
        return Ok((Verdict::Disjoint, 0.0, None));
    };
    if ratio >= cfg.min_overlap {
        return Ok((Verdict::Accepted, ratio, None));
    }
    let spread = dispersion_of_original()?;
    let verdict = if spread > cfg.max_dispersion_deg {
        Verdict::Distorted
    } else {
        Verdict::NearRectilinear
    };
    Ok((verdict, ratio, Some(spread)))
}

/// Acceptance check of an assembled polygon against its original.
pub fn assess(
    original: &Polygon,
    assembled: &Assembled,
    cfg: &OrthoCfg,
) -> Result<Assessment, OrthoError> {
    let rotations = assembled.rotations();
    if assembled.degenerate() {
        return Ok(Assessment {
            verdict: Verdict::Degenerate,
            overlap_ratio: 0.0,
            dispersion: None,
            rotations,
        });
    }
    let overlap = overlap_ratio(original, &assembled.polygon);
    let (verdict, ratio, spread) = decide(
        overlap,
        || {
            classify(original.exterior().points(), cfg.estimate_max_angle_change)
                .map(|cls| dispersion(&cls.corrections))
                .map_err(|gap| gap.in_ring(RingRole::Exterior))
        },
        cfg,
    )?;
    Ok(Assessment {
        verdict,
        overlap_ratio: ratio,
        dispersion: spread,
        rotations,
    })
}
