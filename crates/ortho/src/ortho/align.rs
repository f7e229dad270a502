//! Ring aligner: snap an approximately axis-aligned ring onto the axes.
//!
//! Steps
//! 1. Reclassify the rotated ring at the tighter alignment tolerance.
//! 2. Undo 180° flips: a segment whose bin is opposite to the next segment's
//!    bin takes the bin of the previous segment (uncorrected bins are read).
//! 3. Count the trailing segments that continue segment 0's direction and
//!    rotate the open cycle right by that `shift`, so the run that straddles
//!    the array boundary is contiguous from index 0.
//! 4. Group contiguous same-bin segments into runs (dead-zone segments are
//!    skipped) and replace the x (N/S runs) or y (E/W runs) of every spanned
//!    point with the run mean.
//! 5. Rotate the open cycle back by `shift` and re-close.
//!
//! The closing point is the canonical copy of vertex 0 while runs are snapped:
//! the run starting at segment 0 writes through to it, the last run writes it
//! directly, and vertex 0 is re-synchronized from it before unshifting.

use super::bearing::{classify, ClassificationGap, Direction};
use super::cfg::OrthoCfg;
use crate::geom::{Point, Ring};

/// Aligned ring plus diagnostics.
#[derive(Clone, Debug)]
pub struct Alignment {
    pub ring: Ring,
    /// Bins after flip correction, in ring order.
    pub directions: Vec<Direction>,
    /// Trailing segments stitched onto the first run.
    pub shift: usize,
    /// Runs snapped.
    pub runs: usize,
    /// Segments left untouched (dead zone).
    pub skipped: usize,
    /// Fewer than 3 distinct vertices or (near) zero area after snapping.
    pub degenerate: bool,
}

/// Replace a segment's bin by its predecessor's when it flips against its successor.
pub(crate) fn correct_flips(dirs: &[Direction]) -> Vec<Direction> {
    let n = dirs.len();
    (0..n)
        .map(|i| {
            if dirs[i].is_opposite(dirs[(i + 1) % n]) {
                dirs[(i + n - 1) % n]
            } else {
                dirs[i]
            }
        })
        .collect()
}

/// Number of trailing segments (at most `n − 1`) sharing segment 0's bin.
pub(crate) fn wrap_shift(dirs: &[Direction]) -> usize {
    match dirs.split_first() {
        Some((first, rest)) => rest.iter().rev().take_while(|d| *d == first).count(),
        None => 0,
    }
}

/// Snap points `first ..= last + 1` of the run onto one axis-parallel line.
fn snap_run(pts: &mut [Point], first: usize, last: usize, dir: Direction) {
    let span = &mut pts[first..=last + 1];
    let axis = if dir.is_vertical() { 0 } else { 1 };
    let mean = span.iter().map(|p| p[axis]).sum::<f64>() / span.len() as f64;
    for p in span.iter_mut() {
        p[axis] = mean;
    }
}

/// Align a ring that was already rotated close to the axes.
pub fn align_ring(ring: &Ring, cfg: &OrthoCfg) -> Result<Alignment, ClassificationGap> {
    let cls = classify(ring.points(), cfg.align_max_angle_change)?;
    let n = cls.len();
    let directions = correct_flips(&cls.directions);
    let shift = wrap_shift(&directions);

    let mut dirs = directions.clone();
    let mut bearings = cls.bearings;
    let mut pts: Vec<Point> = ring.open().to_vec();
    dirs.rotate_right(shift);
    bearings.rotate_right(shift);
    pts.rotate_right(shift);
    pts.push(pts[0]);

    let mut runs = 0;
    let mut skipped = 0;
    let mut run_start: Option<usize> = None;
    for i in 0..n {
        if cfg.in_dead_zone(bearings[i]) {
            skipped += 1;
            continue;
        }
        let start = *run_start.get_or_insert(i);
        let continues =
            i + 1 < n && dirs[i + 1] == dirs[i] && !cfg.in_dead_zone(bearings[i + 1]);
        if continues {
            continue;
        }
        snap_run(&mut pts, start, i, dirs[i]);
        if start == 0 {
            pts[n] = pts[0];
        }
        runs += 1;
        run_start = None;
    }

    pts[0] = pts[n];
    pts.truncate(n);
    pts.rotate_left(shift);
    pts.push(pts[0]);
    let aligned = Ring::from_closed(pts);

    let scale = ring.extent();
    let degenerate = aligned.distinct_vertices(1e-9 * scale) < 3
        || aligned.area() <= 1e-9 * scale * scale;

    Ok(Alignment {
        ring: aligned,
        directions,
        shift,
        runs,
        skipped,
        degenerate,
    })
}
