//! Random noisy rectilinear footprints (corner notches + jitter + replay tokens).
//!
//! Purpose
//! - Provide a small, deterministic sampler of building-like rings for
//!   property tests and benches: shapes that are rectilinear up to vertex
//!   noise and a global rotation, i.e. what the orthogonalizer expects.
//!
//! Model
//! - Start from a `w × h` rectangle (CCW). Each corner is replaced by a notch
//!   with probability `notch_prob`; notch depths are fractions of the adjacent
//!   edges, small enough that notches never collide.
//! - Optionally insert collinear mid-edge vertices, then rotate about the
//!   rectangle centre, jitter every vertex, and start the ring at a random
//!   vertex so runs straddle the array boundary.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::affine::Affine2;
use super::types::{Point, Ring};

/// Sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct FootprintCfg {
    /// Rectangle width range.
    pub width: (f64, f64),
    /// Rectangle height range.
    pub height: (f64, f64),
    /// Probability that a corner is replaced by a notch.
    pub notch_prob: f64,
    /// Notch depth as a fraction of the adjacent edge. Keep the upper end below 1/2.
    pub notch_frac: (f64, f64),
    /// Probability of a collinear vertex inside each edge.
    pub midpoint_prob: f64,
    /// Absolute per-coordinate jitter amplitude.
    pub jitter: f64,
    /// Global counter-clockwise rotation range (degrees).
    pub rotation_deg: (f64, f64),
    /// Start the ring at a random vertex?
    pub random_start: bool,
}

impl Default for FootprintCfg {
    fn default() -> Self {
        Self {
            width: (8.0, 20.0),
            height: (8.0, 20.0),
            notch_prob: 0.5,
            notch_frac: (0.15, 0.3),
            midpoint_prob: 0.3,
            jitter: 0.005,
            rotation_deg: (-40.0, 40.0),
            random_start: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// A sampled ring plus the rotation it was drawn with.
#[derive(Clone, Debug)]
pub struct Footprint {
    pub ring: Ring,
    pub rotation_deg: f64,
}

fn uniform<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Draw a noisy rectilinear footprint.
pub fn draw_footprint(cfg: &FootprintCfg, tok: ReplayToken) -> Footprint {
    let mut rng = tok.to_std_rng();
    let w = uniform(&mut rng, cfg.width).max(1e-6);
    let h = uniform(&mut rng, cfg.height).max(1e-6);
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];

    let mut outline: Vec<Point> = Vec::with_capacity(12);
    for k in 0..4 {
        let c = corners[k];
        let prev = corners[(k + 3) % 4];
        let next = corners[(k + 1) % 4];
        if rng.gen_bool(cfg.notch_prob.clamp(0.0, 1.0)) {
            let din = c - prev;
            let dout = next - c;
            let b = uniform(&mut rng, cfg.notch_frac);
            let a = uniform(&mut rng, cfg.notch_frac);
            outline.push(c - din * b);
            outline.push(c - din * b + dout * a);
            outline.push(c + dout * a);
        } else {
            outline.push(c);
        }
    }

    let mut pts: Vec<Point> = Vec::with_capacity(2 * outline.len());
    for i in 0..outline.len() {
        let p = outline[i];
        let q = outline[(i + 1) % outline.len()];
        pts.push(p);
        if rng.gen_bool(cfg.midpoint_prob.clamp(0.0, 1.0)) {
            let t = rng.gen_range(0.3..0.7);
            pts.push(p + (q - p) * t);
        }
    }

    let rotation_deg = uniform(&mut rng, cfg.rotation_deg);
    let rot = Affine2::rotation_about(Point::new(0.5 * w, 0.5 * h), rotation_deg);
    let jitter = cfg.jitter.max(0.0);
    for p in pts.iter_mut() {
        let mut q = rot.apply(*p);
        if jitter > 0.0 {
            q.x += rng.gen_range(-jitter..jitter);
            q.y += rng.gen_range(-jitter..jitter);
        }
        *p = q;
    }

    if cfg.random_start {
        let k = rng.gen_range(0..pts.len());
        pts.rotate_left(k);
    }
    pts.push(pts[0]);
    Footprint {
        ring: Ring::from_closed(pts),
        rotation_deg,
    }
}
