//! Polygon assembler: orthogonalize every ring on its own rotation.
//!
//! Rings do not share an angle: a courtyard or light well can sit at a
//! different orientation than the outline around it.

use tracing::debug;

use super::align::align_ring;
use super::bearing::{classify, ClassificationGap};
use super::cfg::OrthoCfg;
use super::error::OrthoError;
use super::rotation::{estimate_rotation, Estimate, RingRotation};
use crate::geom::{Polygon, Ring, RingRole};

/// One orthogonalized ring with the values that produced it.
#[derive(Clone, Debug)]
pub struct RingOutcome {
    pub role: RingRole,
    pub ring: Ring,
    pub estimate: Estimate,
    pub shift: usize,
    pub runs: usize,
    pub skipped: usize,
    pub degenerate: bool,
}

/// Classify → estimate → rotate → align → rotate back.
pub fn orthogonalize_ring(
    ring: &Ring,
    role: RingRole,
    cfg: &OrthoCfg,
) -> Result<RingOutcome, ClassificationGap> {
    let first = classify(ring.points(), cfg.estimate_max_angle_change)?;
    let estimate = estimate_rotation(&first.corrections, cfg);
    let rotation = RingRotation::about_centroid(ring, estimate.angle_deg);
    let alignment = align_ring(&rotation.forward(ring), cfg)?;
    Ok(RingOutcome {
        role,
        ring: rotation.inverse(&alignment.ring),
        estimate,
        shift: alignment.shift,
        runs: alignment.runs,
        skipped: alignment.skipped,
        degenerate: alignment.degenerate,
    })
}

/// Orthogonalized polygon plus per-ring diagnostics (exterior first).
#[derive(Clone, Debug)]
pub struct Assembled {
    pub polygon: Polygon,
    pub rings: Vec<RingOutcome>,
}

impl Assembled {
    /// Some ring collapsed while snapping.
    pub fn degenerate(&self) -> bool {
        self.rings.iter().any(|r| r.degenerate)
    }

    /// Estimated rotation per ring (degrees), exterior first.
    pub fn rotations(&self) -> Vec<f64> {
        self.rings.iter().map(|r| r.estimate.angle_deg).collect()
    }
}

/// Run the ring pipeline on the exterior and every hole, then reassemble.
///
/// Every ring is processed; the first failing ring (in ring order) is reported.
pub fn assemble_polygon(poly: &Polygon, cfg: &OrthoCfg) -> Result<Assembled, OrthoError> {
    let run = |role: RingRole, ring: &Ring| {
        orthogonalize_ring(ring, role, cfg).map_err(|gap| {
            debug!(%role, segment = gap.segment, bearing = gap.bearing, "classification gap");
            gap.in_ring(role)
        })
    };
    let outcomes: Vec<Result<RingOutcome, OrthoError>> =
        poly.rings().map(|(role, ring)| run(role, ring)).collect();
    let rings = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;

    // `rings()` always yields the exterior first.
    let polygon = Polygon::from_rings(
        rings[0].ring.clone(),
        rings[1..].iter().map(|h| h.ring.clone()).collect(),
    );
    Ok(Assembled { polygon, rings })
}
