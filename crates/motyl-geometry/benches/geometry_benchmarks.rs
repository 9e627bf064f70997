//! Geometry Benchmarks
//!
//! Load-time cost of the procedural meshes and transform tables

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use motyl_geometry::{DodecahedronTables, MoebiusStrip, build_box, build_pentagon};

fn bench_moebius_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("moebius_mesh");
    let strip = MoebiusStrip::new(1.0, 0.1).unwrap();

    for segments in [128u32, 512, 2048].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(segments), segments, |b, &segments| {
            b.iter(|| black_box(strip.build_mesh(segments, 4).unwrap()));
        });
    }

    group.finish();
}

fn bench_moebius_frame(c: &mut Criterion) {
    let strip = MoebiusStrip::new(1.0, 0.1).unwrap();
    c.bench_function("moebius_frame", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t += 0.01;
            black_box(strip.frame(black_box(t), 0.0))
        });
    });
}

fn bench_dodecahedron_tables(c: &mut Criterion) {
    c.bench_function("dodecahedron_tables", |b| {
        b.iter(|| black_box(DodecahedronTables::build()));
    });
}

fn bench_fixed_shapes(c: &mut Criterion) {
    c.bench_function("fixed_shapes", |b| {
        b.iter(|| (black_box(build_box()), black_box(build_pentagon())));
    });
}

criterion_group!(
    benches,
    bench_moebius_mesh,
    bench_moebius_frame,
    bench_dodecahedron_tables,
    bench_fixed_shapes,
);
criterion_main!(benches);
