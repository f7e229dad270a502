//! Curated API surface for the CLI and batch scripts (UNSTABLE).
//!
//! Important
//! - Module paths under `geom` and `ortho` may move; these re-exports are the
//!   names callers should import.

// Data model and frames
pub use crate::geom::{
    convert::{polygon_from_geo, polygon_to_geo},
    Affine2, Frame, Geometry, GeometryKind, MultiPolygon, Point, Polygon, Ring, RingRole,
};
// Sampler
pub use crate::geom::rand::{draw_footprint, Footprint, FootprintCfg, ReplayToken};
// Algorithm stages
pub use crate::ortho::{
    align_ring, assemble_polygon, assess, classify, dispersion, estimate_rotation,
    orthogonalize_ring, Alignment, Assessment, Classification, ClassificationGap, Direction,
    Estimate, EstimateKind, Hysteresis, RingOutcome, RingRotation, Verdict,
};
// Entry points
pub use crate::batch::{orthogonalize_all, BatchStats};
pub use crate::ortho::{orthogonalize, orthogonalize_part, OrthoCfg, OrthoError, OrthoResult, PartResult};
