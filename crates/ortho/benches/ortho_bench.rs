//! Criterion benchmarks for the orthogonalizer.
//! Inputs are sampled footprints with a fixed replay seed; batch sizes n in {1, 64, 1024}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p ortho

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ortho::api::{classify, orthogonalize_ring};
use ortho::prelude::*;

fn sampled(n: u64, seed: u64) -> Vec<Geometry> {
    let cfg = FootprintCfg::default();
    (0..n)
        .map(|i| {
            let fp = draw_footprint(&cfg, ReplayToken::new(seed, i));
            Geometry::Polygon(Polygon::from_rings(fp.ring, vec![]))
        })
        .collect()
}

fn bench_ring(c: &mut Criterion) {
    let cfg = OrthoCfg::default();
    let mut group = c.benchmark_group("ring");
    let fp = draw_footprint(&FootprintCfg::default(), ReplayToken::new(42, 0));
    group.bench_function("classify", |b| {
        b.iter(|| classify(fp.ring.points(), cfg.estimate_max_angle_change))
    });
    group.bench_function("orthogonalize_ring", |b| {
        b.iter(|| orthogonalize_ring(&fp.ring, RingRole::Exterior, &cfg))
    });
    let poly = Polygon::from_rings(fp.ring.clone(), vec![]);
    group.bench_function("orthogonalize_part", |b| {
        b.iter(|| orthogonalize_part(&poly, &cfg))
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let cfg = OrthoCfg::default();
    let mut group = c.benchmark_group("batch");
    for &n in &[1u64, 64, 1024] {
        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, &n| {
            b.iter_batched(
                || sampled(n, 43),
                |geoms| {
                    let _res: Vec<_> = geoms.iter().map(|g| orthogonalize(g, &cfg)).collect();
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("rayon", n), &n, |b, &n| {
            b.iter_batched(
                || sampled(n, 43),
                |geoms| {
                    let _res = orthogonalize_all(&geoms, &cfg);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ring, bench_batch);
criterion_main!(benches);
