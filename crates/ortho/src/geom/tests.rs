use super::convert::{polygon_from_geo, polygon_to_geo, ring_from_geo};
use super::rand::{draw_footprint, FootprintCfg, ReplayToken};
use super::*;
use crate::ortho::OrthoError;
use nalgebra::{matrix, vector};

fn ring(pts: &[(f64, f64)]) -> Ring {
    Ring::from_open(pts.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
}

#[test]
fn ring_requires_closure_and_four_points() {
    let tri_open = vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]];
    let err = Ring::new(tri_open.clone()).unwrap_err();
    assert_eq!(err, MalformedRing { len: 3, closed: false });

    let two = vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 0.0]];
    assert_eq!(Ring::new(two).unwrap_err(), MalformedRing { len: 3, closed: true });
    assert!(Ring::new(vec![]).is_err());

    let r = Ring::from_open(tri_open).unwrap();
    assert_eq!(r.len(), 4);
    assert_eq!(r.segment_count(), 3);
    assert_eq!(r.open().len(), 3);
    assert_eq!(r.points()[0], r.points()[3]);
    // Already closed input is not closed twice.
    assert_eq!(Ring::from_open(r.points().to_vec()).unwrap(), r);
}

#[test]
fn area_sign_follows_orientation() {
    let ccw = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
    let cw = ring(&[(0.0, 0.0), (0.0, 2.0), (4.0, 2.0), (4.0, 0.0)]);
    assert!((ccw.signed_area() - 8.0).abs() < 1e-12);
    assert!((cw.signed_area() + 8.0).abs() < 1e-12);
    assert_eq!(ccw.area(), cw.area());
    assert!((ccw.centroid() - vector![2.0, 1.0]).norm() < 1e-12);
    assert!((cw.centroid() - vector![2.0, 1.0]).norm() < 1e-12);
    assert!((ccw.extent() - 20f64.sqrt()).abs() < 1e-12);
}

#[test]
fn area_is_stable_far_from_origin() {
    let (x0, y0) = (-8.1e6, 5.1e6);
    let r = ring(&[(x0, y0), (x0 + 3.0, y0), (x0 + 3.0, y0 + 2.0), (x0, y0 + 2.0)]);
    assert!((r.area() - 6.0).abs() < 1e-6);
    assert!((r.centroid() - vector![x0 + 1.5, y0 + 1.0]).norm() < 1e-6);
}

#[test]
fn collinear_ring_centroid_is_vertex_mean() {
    let r = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    assert_eq!(r.area(), 0.0);
    assert!((r.centroid() - vector![1.0, 0.0]).norm() < 1e-12);
}

#[test]
fn distinct_vertices_respects_tolerance() {
    let r = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1e-12), (1.0, 1.0)]);
    assert_eq!(r.distinct_vertices(0.0), 4);
    assert_eq!(r.distinct_vertices(1e-9), 3);
}

#[test]
fn map_recloses_from_first_point() {
    let r = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
    let shifted = r.map(|p| p + vector![1.0, -1.0]);
    assert_eq!(shifted.len(), r.len());
    assert_eq!(shifted.points()[0], vector![1.0, -1.0]);
    assert_eq!(shifted.points()[0], shifted.points()[4]);
}

#[test]
fn polygon_rings_carry_roles() {
    let ext = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let h0 = ring(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)]);
    let h1 = ring(&[(5.0, 5.0), (5.0, 7.0), (7.0, 7.0), (7.0, 5.0)]);
    let poly = Polygon::from_rings(ext, vec![h0, h1]);
    let roles: Vec<RingRole> = poly.rings().map(|(role, _)| role).collect();
    assert_eq!(
        roles,
        vec![RingRole::Exterior, RingRole::Interior(0), RingRole::Interior(1)]
    );
    assert!((poly.area() - 95.0).abs() < 1e-12);
    assert_eq!(RingRole::Interior(1).to_string(), "interior ring 1");

    let g = Geometry::from(poly.clone());
    assert_eq!(g.kind(), GeometryKind::Polygon);
    assert_eq!(g.parts().len(), 1);
    let mg = Geometry::from(MultiPolygon(vec![poly.clone(), poly]));
    assert_eq!(mg.kind(), GeometryKind::MultiPolygon);
    assert_eq!(mg.parts().len(), 2);
}

#[test]
fn rotation_about_pivot_is_rigid() {
    let rot = Affine2::rotation_about(vector![1.0, 1.0], 90.0);
    assert!((rot.apply(vector![2.0, 1.0]) - vector![1.0, 2.0]).norm() < 1e-12);
    assert!((rot.apply(vector![1.0, 1.0]) - vector![1.0, 1.0]).norm() < 1e-12);
    assert!(rot.is_rigid(1e-12));
    assert!(Affine2::identity().is_rigid(0.0));

    let shear = Affine2 {
        m: matrix![1.0, 1.0; 0.0, 1.0],
        t: vector![0.0, 0.0],
    };
    assert!(!shear.is_rigid(1e-9));
    let reflection = Affine2 {
        m: matrix![-1.0, 0.0; 0.0, 1.0],
        t: vector![0.0, 0.0],
    };
    assert!(!reflection.is_rigid(1e-9));
}

#[test]
fn web_mercator_round_trips() {
    let f = Frame::WebMercator;
    assert!(f.forward(vector![0.0, 0.0]).norm() < 1e-9);
    let edge = f.forward(vector![180.0, 0.0]);
    assert!((edge.x - std::f64::consts::PI * 6_378_137.0).abs() < 1e-6);
    for p in [vector![-72.68, 41.76], vector![13.4, 52.5], vector![151.2, -33.9]] {
        let back = f.inverse(f.forward(p));
        assert!((back - p).norm() < 1e-9, "{p:?} -> {back:?}");
    }
    // Latitudes beyond the Mercator square are clamped.
    let pole = f.inverse(f.forward(vector![0.0, 90.0]));
    assert!((pole.y - 85.051_128_779_806_59).abs() < 1e-9);

    let p = vector![3.0, 4.0];
    assert_eq!(Frame::Planar.forward(p), p);
    assert_eq!(Frame::Planar.inverse(p), p);
    assert_eq!(Frame::default(), Frame::Planar);
}

#[test]
fn frame_parses_names() {
    assert_eq!("planar".parse::<Frame>(), Ok(Frame::Planar));
    assert_eq!("web-mercator".parse::<Frame>(), Ok(Frame::WebMercator));
    assert_eq!("epsg:3857".parse::<Frame>(), Ok(Frame::WebMercator));
    assert!("utm".parse::<Frame>().is_err());
}

#[test]
fn geo_conversion_round_trips() {
    let ext = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let hole = ring(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)]);
    let poly = Polygon::from_rings(ext, vec![hole]);
    let back = polygon_from_geo(&polygon_to_geo(&poly)).unwrap();
    assert_eq!(back, poly);

    let open = geo::LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
    assert_eq!(ring_from_geo(&open, RingRole::Exterior).unwrap().len(), 4);
    let short = geo::LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]);
    assert_eq!(
        ring_from_geo(&short, RingRole::Interior(2)).unwrap_err(),
        OrthoError::MalformedRing {
            role: RingRole::Interior(2),
            len: 3,
            closed: true
        }
    );
}

#[test]
fn sampler_is_reproducible_per_token() {
    let cfg = FootprintCfg::default();
    let a = draw_footprint(&cfg, ReplayToken::new(7, 3));
    let b = draw_footprint(&cfg, ReplayToken::new(7, 3));
    let c = draw_footprint(&cfg, ReplayToken::new(7, 4));
    assert_eq!(a.ring, b.ring);
    assert_eq!(a.rotation_deg, b.rotation_deg);
    assert_ne!(a.ring, c.ring);
    for fp in [&a, &c] {
        assert!(fp.ring.len() >= 5);
        assert_eq!(fp.ring.points()[0], fp.ring.points()[fp.ring.len() - 1]);
        assert!(fp.rotation_deg >= -40.0 && fp.rotation_deg < 40.0);
        assert!(fp.ring.signed_area() > 0.0);
    }
}

#[test]
fn sampler_without_noise_draws_plain_rectangle() {
    let cfg = FootprintCfg {
        width: (5.0, 5.0),
        height: (3.0, 3.0),
        notch_prob: 0.0,
        midpoint_prob: 0.0,
        jitter: 0.0,
        rotation_deg: (0.0, 0.0),
        random_start: false,
        ..FootprintCfg::default()
    };
    let fp = draw_footprint(&cfg, ReplayToken::new(0, 0));
    assert_eq!(fp.rotation_deg, 0.0);
    let expected = ring(&[(0.0, 0.0), (5.0, 0.0), (5.0, 3.0), (0.0, 3.0)]);
    for (p, q) in fp.ring.points().iter().zip(expected.points()) {
        assert!((p - q).norm() < 1e-12);
    }
    assert_eq!(fp.ring.len(), 5);
}
