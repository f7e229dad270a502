//! Entry points: one geometry in, one geometry (plus verdicts) out.
//!
//! Every part is projected into the working frame, assembled, checked, and
//! either mapped back (accepted) or replaced by the caller's untouched
//! original (rejected or failed). Parts never influence each other.

use tracing::debug;

use super::accept::{assess, Assessment, Verdict};
use super::assemble::assemble_polygon;
use super::cfg::OrthoCfg;
use super::error::OrthoError;
use crate::geom::{Geometry, GeometryKind, MultiPolygon, Polygon};

/// Output for one simple polygon part.
#[derive(Clone, Debug)]
pub struct PartResult {
    /// Orthogonalized polygon when accepted, the original otherwise.
    pub polygon: Polygon,
    pub outcome: Result<Assessment, OrthoError>,
}

impl PartResult {
    pub fn accepted(&self) -> bool {
        matches!(&self.outcome, Ok(a) if a.verdict.is_accepted())
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.outcome.as_ref().ok().map(|a| a.verdict)
    }

    pub fn overlap_ratio(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|a| a.overlap_ratio)
    }

    pub fn error(&self) -> Option<&OrthoError> {
        self.outcome.as_ref().err()
    }
}

/// Output for one input geometry, one entry per part in input order.
#[derive(Clone, Debug)]
pub struct OrthoResult {
    pub kind: GeometryKind,
    pub parts: Vec<PartResult>,
}

impl OrthoResult {
    /// Reassemble a geometry of the input kind.
    pub fn geometry(&self) -> Geometry {
        let mut parts: Vec<Polygon> = self.parts.iter().map(|p| p.polygon.clone()).collect();
        match self.kind {
            GeometryKind::Polygon if parts.len() == 1 => Geometry::Polygon(parts.remove(0)),
            _ => Geometry::MultiPolygon(MultiPolygon(parts)),
        }
    }

    pub fn accepted_parts(&self) -> usize {
        self.parts.iter().filter(|p| p.accepted()).count()
    }

    pub fn failed_parts(&self) -> usize {
        self.parts.iter().filter(|p| p.error().is_some()).count()
    }
}

/// Orthogonalize one simple polygon part and run the acceptance check.
pub fn orthogonalize_part(poly: &Polygon, cfg: &OrthoCfg) -> PartResult {
    let plane = cfg.frame.forward_polygon(poly);
    let outcome = assemble_polygon(&plane, cfg).and_then(|assembled| {
        let assessment = assess(&plane, &assembled, cfg)?;
        Ok((assembled, assessment))
    });
    match outcome {
        Ok((assembled, assessment)) if assessment.verdict.is_accepted() => PartResult {
            polygon: cfg.frame.inverse_polygon(&assembled.polygon),
            outcome: Ok(assessment),
        },
        Ok((_, assessment)) => {
            debug!(
                verdict = %assessment.verdict,
                overlap_ratio = assessment.overlap_ratio,
                dispersion = ?assessment.dispersion,
                "orthogonalization rolled back"
            );
            PartResult {
                polygon: poly.clone(),
                outcome: Ok(assessment),
            }
        }
        Err(err) => {
            debug!(error = %err, "orthogonalization failed, keeping original");
            PartResult {
                polygon: poly.clone(),
                outcome: Err(err),
            }
        }
    }
}

/// Orthogonalize a polygon, or every part of a multi-polygon independently.
pub fn orthogonalize(geometry: &Geometry, cfg: &OrthoCfg) -> OrthoResult {
    OrthoResult {
        kind: geometry.kind(),
        parts: geometry
            .parts()
            .iter()
            .map(|part| orthogonalize_part(part, cfg))
            .collect(),
    }
}
