//! Edge bearings and cardinal-direction classification with hysteresis.
//!
//! Each edge `i → i+1` gets a compass bearing in [0, 360) and a bin in
//! {N, E, S, W}. The bin windows are 90° wide around 0/90/180/270, shifted by
//! a limit array carried over from the previous edge: with `d = 45 − θ` the
//! previous bin narrows to ±θ and its two neighbours extend into the freed
//! range, so an edge leaves the previous direction once it deviates by more
//! than θ. The opposite bin is untouched.

use serde::{Deserialize, Serialize};

use super::error::OrthoError;
use crate::geom::{Point, RingRole};

/// Cardinal direction bin, `{N, E, S, W} ≡ {0, 1, 2, 3}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(k: usize) -> Self {
        Self::ALL[k % 4]
    }

    /// N/S edges are aligned by snapping x; E/W edges by snapping y.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// Opposite cardinal directions (N/S or E/W).
    #[inline]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.index().abs_diff(other.index()) == 2
    }
}

/// Compass bearing of `a → b` in [0, 360): 0 = +y, 90 = +x.
#[inline]
pub fn bearing(a: Point, b: Point) -> f64 {
    let d = b - a;
    (d.x.atan2(d.y).to_degrees() + 360.0) % 360.0
}

/// Window offsets carried from one edge to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hysteresis {
    limit: [f64; 4],
}

impl Hysteresis {
    /// State after an edge classified as `dir` under tolerance `max_angle_change`.
    pub fn after(dir: Direction, max_angle_change: f64) -> Self {
        let d = 45.0 - max_angle_change;
        let mut limit = [0.0; 4];
        limit[dir.index()] = d;
        limit[(dir.index() + 1) % 4] = -d;
        limit[(dir.index() + 3) % 4] = -d;
        Self { limit }
    }

    /// Bin and correction angle for `bearing`, or `None` when no window matches.
    ///
    /// Windows are tested E, S, W, N-high, N-low; overlaps created by the
    /// limits resolve to the first match.
    pub fn classify(&self, bearing: f64) -> Option<(Direction, f64)> {
        let l = &self.limit;
        if bearing > 45.0 + l[1] && bearing <= 135.0 - l[1] {
            Some((Direction::East, bearing - 90.0))
        } else if bearing > 135.0 + l[2] && bearing <= 225.0 - l[2] {
            Some((Direction::South, bearing - 180.0))
        } else if bearing > 225.0 + l[3] && bearing <= 315.0 - l[3] {
            Some((Direction::West, bearing - 270.0))
        } else if bearing > 315.0 + l[0] && bearing <= 360.0 {
            Some((Direction::North, bearing - 360.0))
        } else if (0.0..=45.0 - l[0]).contains(&bearing) {
            Some((Direction::North, bearing))
        } else {
            None
        }
    }
}

/// Bearing matched no window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassificationGap {
    pub segment: usize,
    pub bearing: f64,
}

impl ClassificationGap {
    pub fn in_ring(self, role: RingRole) -> OrthoError {
        OrthoError::ClassificationGap {
            role,
            segment: self.segment,
            bearing: self.bearing,
        }
    }
}

/// Per-edge bearings, correction angles and bins (all of length `n − 1`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    pub bearings: Vec<f64>,
    pub corrections: Vec<f64>,
    pub directions: Vec<Direction>,
}

impl Classification {
    #[inline]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// Classify every edge of a closed point sequence.
///
/// The hysteresis state is folded edge to edge, starting from zero offsets.
pub fn classify(
    points: &[Point],
    max_angle_change: f64,
) -> Result<Classification, ClassificationGap> {
    let n = points.len().saturating_sub(1);
    let mut out = Classification {
        bearings: Vec::with_capacity(n),
        corrections: Vec::with_capacity(n),
        directions: Vec::with_capacity(n),
    };
    points.windows(2).enumerate().try_fold(
        Hysteresis::default(),
        |state, (segment, w)| -> Result<Hysteresis, ClassificationGap> {
            let b = bearing(w[0], w[1]);
            let (dir, correction) = state
                .classify(b)
                .ok_or(ClassificationGap { segment, bearing: b })?;
            out.bearings.push(b);
            out.corrections.push(correction);
            out.directions.push(dir);
            Ok(Hysteresis::after(dir, max_angle_change))
        },
    )?;
    Ok(out)
}
