//! Parallel driver over a collection of footprints.
//!
//! `orthogonalize` is a pure function of its inputs, so geometries are fanned
//! out over the rayon pool without locking; results keep input order.

use rayon::prelude::*;
use tracing::info;

use crate::geom::Geometry;
use crate::ortho::{orthogonalize, OrthoCfg, OrthoResult};

/// Part-level counts over a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub geometries: usize,
    pub parts: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl BatchStats {
    pub fn from_results(results: &[OrthoResult]) -> Self {
        results.iter().fold(
            BatchStats {
                geometries: results.len(),
                ..Default::default()
            },
            |mut s, r| {
                let accepted = r.accepted_parts();
                let failed = r.failed_parts();
                s.parts += r.parts.len();
                s.accepted += accepted;
                s.failed += failed;
                s.rejected += r.parts.len() - accepted - failed;
                s
            },
        )
    }
}

/// Orthogonalize every geometry on the rayon pool.
pub fn orthogonalize_all(geometries: &[Geometry], cfg: &OrthoCfg) -> Vec<OrthoResult> {
    let results: Vec<OrthoResult> = geometries
        .par_iter()
        .map(|g| orthogonalize(g, cfg))
        .collect();
    let stats = BatchStats::from_results(&results);
    info!(
        geometries = stats.geometries,
        parts = stats.parts,
        accepted = stats.accepted,
        rejected = stats.rejected,
        failed = stats.failed,
        "orthogonalized batch"
    );
    results
}
