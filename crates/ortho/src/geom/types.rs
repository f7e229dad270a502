//! Rings, polygons and multi-part footprints.
//!
//! - `Ring`: closed point sequence (first == last), at least 4 points.
//! - `Polygon`: exterior ring plus holes; holes are assumed contained and
//!   pairwise disjoint (not re-validated).
//! - `Geometry`: what a caller hands in, a polygon or a multi-polygon.

use std::fmt;

use nalgebra::Vector2;

use crate::ortho::OrthoError;

/// Planar point `(x, y)`.
pub type Point = Vector2<f64>;

/// Position of a ring inside its polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingRole {
    Exterior,
    /// Zero-based hole index.
    Interior(usize),
}

impl fmt::Display for RingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingRole::Exterior => write!(f, "exterior ring"),
            RingRole::Interior(k) => write!(f, "interior ring {k}"),
        }
    }
}

/// Ring validation failure, before the ring's role is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MalformedRing {
    pub len: usize,
    pub closed: bool,
}

impl MalformedRing {
    /// Attach the ring's role.
    pub fn in_ring(self, role: RingRole) -> OrthoError {
        OrthoError::MalformedRing {
            role,
            len: self.len,
            closed: self.closed,
        }
    }
}

/// Closed ring of planar points.
///
/// Invariants:
/// - `len() >= Ring::MIN_LEN`.
/// - `points()[0] == points()[len() - 1]` exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pts: Vec<Point>,
}

impl Ring {
    /// Triangle plus closing point.
    pub const MIN_LEN: usize = 4;

    /// Validate an already closed point sequence.
    pub fn new(pts: Vec<Point>) -> Result<Self, MalformedRing> {
        let closed = pts.len() >= 2 && pts.first() == pts.last();
        if pts.len() < Self::MIN_LEN || !closed {
            return Err(MalformedRing {
                len: pts.len(),
                closed,
            });
        }
        Ok(Self { pts })
    }

    /// Close an open point sequence (no-op if it is closed already), then validate.
    pub fn from_open(mut pts: Vec<Point>) -> Result<Self, MalformedRing> {
        if let Some(&first) = pts.first() {
            if pts.len() < 2 || pts.last() != Some(&first) {
                pts.push(first);
            }
        }
        Self::new(pts)
    }

    /// Internal constructor for sequences the algorithm closed itself.
    pub(crate) fn from_closed(pts: Vec<Point>) -> Self {
        debug_assert!(pts.len() >= Self::MIN_LEN && pts.first() == pts.last());
        Self { pts }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.pts
    }

    /// Points without the duplicate closing point.
    #[inline]
    pub fn open(&self) -> &[Point] {
        &self.pts[..self.pts.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Number of edges, `len() - 1`.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.pts.len() - 1
    }

    /// Apply `f` to every vertex; the closing point is re-derived from the first.
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Ring {
        let mut pts: Vec<Point> = self.open().iter().map(|&p| f(p)).collect();
        pts.push(pts[0]);
        Ring::from_closed(pts)
    }

    /// Shoelace area, positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        // Relative to the first vertex to keep large projected coordinates exact enough.
        let o = self.pts[0];
        let twice: f64 = self
            .pts
            .windows(2)
            .map(|w| {
                let p = w[0] - o;
                let q = w[1] - o;
                p.x * q.y - q.x * p.y
            })
            .sum();
        0.5 * twice
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid; falls back to the vertex mean for (near) zero-area rings.
    pub fn centroid(&self) -> Point {
        let o = self.pts[0];
        let mut a = 0.0;
        let mut c = Vector2::zeros();
        for w in self.pts.windows(2) {
            let p = w[0] - o;
            let q = w[1] - o;
            let cross = p.x * q.y - q.x * p.y;
            a += cross;
            c += (p + q) * cross;
        }
        a *= 0.5;
        if a.abs() <= 1e-12 * self.extent().powi(2).max(f64::MIN_POSITIVE) {
            let open = self.open();
            let sum = open.iter().fold(Vector2::zeros(), |acc, p| acc + (p - o));
            return o + sum / open.len() as f64;
        }
        o + c / (6.0 * a)
    }

    /// Number of pairwise distinct vertices (ignoring the closing point), up to `eps`.
    pub fn distinct_vertices(&self, eps: f64) -> usize {
        let mut seen: Vec<Point> = Vec::with_capacity(self.pts.len());
        for p in self.open() {
            if !seen.iter().any(|q| (p - q).norm() <= eps) {
                seen.push(*p);
            }
        }
        seen.len()
    }

    /// Bounding-box diagonal; the length scale for relative tolerances.
    pub fn extent(&self) -> f64 {
        let (mut lo, mut hi) = (self.pts[0], self.pts[0]);
        for p in &self.pts {
            lo = lo.inf(p);
            hi = hi.sup(p);
        }
        (hi - lo).norm()
    }
}

/// Polygon with an exterior ring and zero or more holes.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    interiors: Vec<Ring>,
}

impl Polygon {
    /// Validate closed point sequences into a polygon.
    pub fn new(exterior: Vec<Point>, interiors: Vec<Vec<Point>>) -> Result<Self, OrthoError> {
        let exterior = Ring::new(exterior).map_err(|e| e.in_ring(RingRole::Exterior))?;
        let interiors = interiors
            .into_iter()
            .enumerate()
            .map(|(k, pts)| Ring::new(pts).map_err(|e| e.in_ring(RingRole::Interior(k))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            exterior,
            interiors,
        })
    }

    pub fn from_rings(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    #[inline]
    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    #[inline]
    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    /// Exterior first, then holes in order.
    pub fn rings(&self) -> impl Iterator<Item = (RingRole, &Ring)> + '_ {
        std::iter::once((RingRole::Exterior, &self.exterior)).chain(
            self.interiors
                .iter()
                .enumerate()
                .map(|(k, r)| (RingRole::Interior(k), r)),
        )
    }

    /// Exterior area minus hole areas.
    pub fn area(&self) -> f64 {
        self.exterior.area() - self.interiors.iter().map(Ring::area).sum::<f64>()
    }

    /// Apply `f` to every vertex of every ring.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Polygon {
        Polygon {
            exterior: self.exterior.map(&f),
            interiors: self.interiors.iter().map(|r| r.map(&f)).collect(),
        }
    }
}

/// Ordered collection of independent polygon parts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPolygon(pub Vec<Polygon>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
}

/// Input footprint.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Simple polygon parts; a polygon is its own single part.
    pub fn parts(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(p) => std::slice::from_ref(p),
            Geometry::MultiPolygon(mp) => &mp.0,
        }
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Geometry::Polygon(p)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Geometry::MultiPolygon(mp)
    }
}
