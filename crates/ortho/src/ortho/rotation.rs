//! Dominant rotation of a ring and the rigid rotation about its centroid.
//!
//! - `estimate_rotation`: median correction angle, or a fixed fallback when
//!   the angles are too spread out to pick a turning direction.
//! - `RingRotation`: forward/inverse pair sharing one pivot, so the inverse
//!   undoes the forward map exactly even after the ring was reshaped.

use tracing::trace;

use super::cfg::OrthoCfg;
use crate::geom::{Affine2, Point, Ring};

/// Population standard deviation (0 for an empty slice).
pub fn dispersion(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}

/// Median; mean of the middle pair for even counts (0 for an empty slice).
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        0.5 * (sorted[mid - 1] + sorted[mid])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimateKind {
    /// Median of the correction angles.
    Median,
    /// Spread too large; the configured fallback angle was used.
    AmbiguousFallback,
}

/// Rotation that brings a ring close to axis alignment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    /// Counter-clockwise rotation to apply (degrees).
    pub angle_deg: f64,
    /// Population standard deviation of the correction angles.
    pub spread_deg: f64,
    pub kind: EstimateKind,
}

/// Estimate the ring rotation from first-pass correction angles.
///
/// Known approximation: a ring near 45° could be squared by turning either
/// way; the fallback does not try to recover the true orientation.
pub fn estimate_rotation(corrections: &[f64], cfg: &OrthoCfg) -> Estimate {
    let spread_deg = dispersion(corrections);
    if spread_deg < cfg.ambiguous_spread_deg {
        Estimate {
            angle_deg: median(corrections),
            spread_deg,
            kind: EstimateKind::Median,
        }
    } else {
        trace!(spread_deg, "ambiguous orientation, using fallback rotation");
        Estimate {
            angle_deg: cfg.ambiguous_fallback_deg,
            spread_deg,
            kind: EstimateKind::AmbiguousFallback,
        }
    }
}

/// Rigid rotation of a ring about its area centroid.
///
/// `inverse` turns back about the pivot of the ring that was passed to
/// `about_centroid`, not about the centroid of the ring it is applied to. A
/// snapped ring whose centroid moved therefore lands where the forward map
/// came from; rotating back about the snapped ring's own centroid would add a
/// small translation.
#[derive(Clone, Copy, Debug)]
pub struct RingRotation {
    pivot: Point,
    angle_deg: f64,
    fwd: Affine2,
    inv: Affine2,
}

impl RingRotation {
    /// Counter-clockwise rotation by `angle_deg` about the centroid of `ring`.
    pub fn about_centroid(ring: &Ring, angle_deg: f64) -> Self {
        let pivot = ring.centroid();
        let (fwd, inv) = if angle_deg == 0.0 {
            (Affine2::identity(), Affine2::identity())
        } else {
            (
                Affine2::rotation_about(pivot, angle_deg),
                Affine2::rotation_about(pivot, -angle_deg),
            )
        };
        debug_assert!(fwd.is_rigid(1e-12) && inv.is_rigid(1e-12));
        Self {
            pivot,
            angle_deg,
            fwd,
            inv,
        }
    }

    #[inline]
    pub fn pivot(&self) -> Point {
        self.pivot
    }

    #[inline]
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn forward(&self, ring: &Ring) -> Ring {
        ring.map(|p| self.fwd.apply(p))
    }

    pub fn inverse(&self, ring: &Ring) -> Ring {
        ring.map(|p| self.inv.apply(p))
    }
}
