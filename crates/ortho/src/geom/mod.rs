//! Footprint data model and planar helpers.
//!
//! Purpose
//! - Closed rings, polygons with holes and multi-part footprints as immutable
//!   values; constructors validate closure and minimum length once so the
//!   algorithm never re-checks.
//! - Rigid 2D maps (`Affine2`) and working frames (`Frame`) used by the
//!   rotation step.
//! - Adapters to `geo` types and a reproducible sampler of noisy rectilinear
//!   footprints for tests and benches.
//!
//! Code cross-refs: `ortho::{align_ring, assemble_polygon, assess}`.

mod affine;
pub mod convert;
mod frame;
pub mod rand;
mod types;

pub use affine::Affine2;
pub use frame::Frame;
pub use types::{Geometry, GeometryKind, MalformedRing, MultiPolygon, Point, Polygon, Ring, RingRole};

#[cfg(test)]
mod tests;
