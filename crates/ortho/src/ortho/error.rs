//! Errors surfaced by the orthogonalizer.
//!
//! Rejections by the acceptance check are not errors: they are reported as a
//! `Verdict` and the caller keeps the original geometry.

use std::fmt;

use crate::geom::RingRole;

#[derive(Clone, Debug, PartialEq)]
pub enum OrthoError {
    /// Fewer than 4 points, or first point != last point.
    MalformedRing {
        role: RingRole,
        len: usize,
        closed: bool,
    },
    /// A bearing fell into none of the direction windows (NaN coordinates).
    ClassificationGap {
        role: RingRole,
        segment: usize,
        bearing: f64,
    },
    /// Configuration out of range.
    InvalidCfg { reason: String },
}

impl OrthoError {
    pub(crate) fn invalid_cfg(reason: impl Into<String>) -> Self {
        Self::InvalidCfg {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for OrthoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrthoError::MalformedRing { role, len, closed } => {
                if *closed {
                    write!(f, "{role} has {len} points (needs at least 4)")
                } else {
                    write!(f, "{role} is not closed ({len} points, first != last)")
                }
            }
            OrthoError::ClassificationGap {
                role,
                segment,
                bearing,
            } => write!(
                f,
                "{role}: segment {segment} with bearing {bearing} matched no direction window"
            ),
            OrthoError::InvalidCfg { reason } => write!(f, "invalid orthogonalizer config: {reason}"),
        }
    }
}

impl std::error::Error for OrthoError {}
