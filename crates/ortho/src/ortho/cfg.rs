//! Orthogonalizer configuration.
//!
//! Policy
//! - Defaults are the empirically tuned values the algorithm ships with. They
//!   are plain fields so batch drivers can retune against new data without
//!   touching call sites; `validate` guards the ranges the algorithm relies on.

use serde::{Deserialize, Serialize};

use super::error::OrthoError;
use crate::geom::Frame;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrthoCfg {
    /// Hysteresis θ for the rotation-estimate pass (degrees, in (0, 45]).
    pub estimate_max_angle_change: f64,
    /// Hysteresis θ for the alignment pass on the rotated ring.
    pub align_max_angle_change: f64,
    /// Correction-angle spread above which the median is not trusted.
    pub ambiguous_spread_deg: f64,
    /// Rotation used when the spread is ambiguous.
    pub ambiguous_fallback_deg: f64,
    /// Open interval of `bearing mod 90` where a segment is left untouched.
    pub dead_zone_deg: (f64, f64),
    /// Overlap ratio at or above which a result is accepted outright.
    ///
    /// Compared against the unrounded ratio: 0.9496 falls short of 0.95 even
    /// though it prints as 0.950 with three decimals.
    pub min_overlap: f64,
    /// Original correction-angle spread above which a low-overlap result is rejected.
    pub max_dispersion_deg: f64,
    /// Working frame for classification, rotation and area evaluation.
    pub frame: Frame,
}

impl Default for OrthoCfg {
    fn default() -> Self {
        Self {
            estimate_max_angle_change: 45.0,
            align_max_angle_change: 15.0,
            ambiguous_spread_deg: 30.0,
            ambiguous_fallback_deg: 45.0,
            dead_zone_deg: (30.0, 60.0),
            min_overlap: 0.95,
            max_dispersion_deg: 9.0,
            frame: Frame::Planar,
        }
    }
}

impl OrthoCfg {
    pub fn validate(&self) -> Result<(), OrthoError> {
        for (name, theta) in [
            ("estimate_max_angle_change", self.estimate_max_angle_change),
            ("align_max_angle_change", self.align_max_angle_change),
        ] {
            if !(theta > 0.0 && theta <= 45.0) {
                return Err(OrthoError::invalid_cfg(format!(
                    "{name} = {theta} is outside (0, 45]"
                )));
            }
        }
        let (lo, hi) = self.dead_zone_deg;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(OrthoError::invalid_cfg(format!(
                "dead_zone_deg = ({lo}, {hi}) is not a finite interval"
            )));
        }
        if !(self.min_overlap > 0.0 && self.min_overlap <= 1.0) {
            return Err(OrthoError::invalid_cfg(format!(
                "min_overlap = {} is outside (0, 1]",
                self.min_overlap
            )));
        }
        for (name, v) in [
            ("ambiguous_spread_deg", self.ambiguous_spread_deg),
            ("ambiguous_fallback_deg", self.ambiguous_fallback_deg),
            ("max_dispersion_deg", self.max_dispersion_deg),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(OrthoError::invalid_cfg(format!(
                    "{name} = {v} must be finite and non-negative"
                )));
            }
        }
        Ok(())
    }

    /// `bearing mod 90` strictly inside the dead zone?
    #[inline]
    pub fn in_dead_zone(&self, bearing: f64) -> bool {
        let r = bearing.rem_euclid(90.0);
        r > self.dead_zone_deg.0 && r < self.dead_zone_deg.1
    }
}
