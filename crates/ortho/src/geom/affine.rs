//! Rigid 2D maps used by the rotation step.

use nalgebra::{Matrix2, Vector2};

use super::types::Point;

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    /// Counter-clockwise rotation by `angle_deg` about `pivot`: `p ↦ C + R(φ)(p − C)`.
    pub fn rotation_about(pivot: Point, angle_deg: f64) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let m = Matrix2::new(c, -s, s, c);
        Self {
            m,
            t: pivot - m * pivot,
        }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        self.m * p + self.t
    }

    /// Orientation-preserving isometry check (`MᵀM ≈ I`, `det M > 0`).
    pub fn is_rigid(&self, eps: f64) -> bool {
        let gram = self.m.transpose() * self.m;
        (gram - Matrix2::identity()).abs().max() <= eps && self.m.determinant() > 0.0
    }
}
