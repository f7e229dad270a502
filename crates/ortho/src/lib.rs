//! Footprint orthogonalization: square up noisy building outlines.
//!
//! A ring is classified edge by edge into cardinal bins, rotated by its
//! dominant correction angle, snapped run by run onto the axes, rotated back,
//! and finally checked against the original: transforms that move too much
//! area on a shape that was not already near-rectilinear are rolled back.
//!
//! Layout
//! - `geom`: data model (`Ring`, `Polygon`, ...), rigid maps, working frames,
//!   `geo` adapters and a reproducible footprint sampler.
//! - `ortho`: the algorithm (classifier, estimator, aligner, assembler,
//!   validator) and the `orthogonalize` entry point.
//! - `batch`: parallel driver over a collection of geometries.
//!
//! API Policy
//! - The crate is consumed by the workspace CLI and by batch scripts. Prefer
//!   `api` or `prelude` imports; module paths may move.

pub mod api;
pub mod batch;
pub mod geom;
pub mod ortho;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom::{Geometry, MultiPolygon, Point, Polygon, Ring, RingRole};
pub use ortho::{orthogonalize, orthogonalize_part, OrthoCfg, OrthoError, OrthoResult};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::batch::{orthogonalize_all, BatchStats};
    pub use crate::geom::rand::{draw_footprint, FootprintCfg, ReplayToken};
    pub use crate::geom::{Frame, Geometry, MultiPolygon, Point, Polygon, Ring, RingRole};
    pub use crate::ortho::{
        orthogonalize, orthogonalize_part, Assessment, Direction, OrthoCfg, OrthoError,
        OrthoResult, PartResult, Verdict,
    };
    pub use nalgebra::Vector2 as Vec2;
}
