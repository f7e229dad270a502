//! Polygon orthogonalization.
//!
//! Purpose
//! - Square up noisy footprint rings: edges become parallel or perpendicular
//!   to one dominant orientation per ring, with vertex count and closure
//!   preserved.
//! - Roll the change back when it moves too much area on a shape that was not
//!   rectilinear to begin with.
//!
//! Pipeline per ring: `classify` (θ = 45) → `estimate_rotation` →
//! `RingRotation::forward` → `align_ring` (θ = 15) → `RingRotation::inverse`.
//! `assemble_polygon` runs it on every ring, `assess` decides per part, and
//! `orthogonalize` dispatches parts.
//!
//! Code cross-refs: `geom::{Ring, Polygon, Frame, Affine2}`, `batch::orthogonalize_all`.

mod accept;
mod align;
mod assemble;
mod bearing;
mod cfg;
mod error;
mod pipeline;
mod rotation;

pub use accept::{assess, decide, overlap_ratio, Assessment, Verdict};
pub use align::{align_ring, Alignment};
pub use assemble::{assemble_polygon, orthogonalize_ring, Assembled, RingOutcome};
pub use bearing::{bearing, classify, Classification, ClassificationGap, Direction, Hysteresis};
pub use cfg::OrthoCfg;
pub use error::OrthoError;
pub use pipeline::{orthogonalize, orthogonalize_part, OrthoResult, PartResult};
pub use rotation::{dispersion, estimate_rotation, median, Estimate, EstimateKind, RingRotation};
