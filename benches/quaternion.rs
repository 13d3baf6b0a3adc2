//! Hamilton product and point rotation: SIMD vs component-wise scalar.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use quadlane::quat::scalar;
use quadlane::{quat_lerp, quat_multiply, rotate_point_fused, rotate_points};
use quadlane::{Quat, SeedGen, Tier, Vec4};

const POINT_COUNTS: &[usize] = &[64, 4_096, 262_144];

fn benchmark_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quaternion product");
    let mut seeds = SeedGen::new(42);
    let (a, b) = (seeds.unit_quat(), seeds.unit_quat());

    group.bench_function("scalar", |bench| {
        bench.iter(|| black_box(scalar::multiply(black_box(&a), black_box(&b))))
    });
    if Tier::Sse.is_supported() {
        group.bench_function("sse", |bench| {
            bench.iter(|| black_box(quat_multiply(black_box(&a), black_box(&b))))
        });
    }
    group.bench_function("lerp", |bench| {
        bench.iter(|| black_box(quat_lerp(black_box(&a), black_box(&b), 0.3)))
    });

    group.finish();
}

fn benchmark_rotation(c: &mut Criterion) {
    if !Tier::Sse.is_supported() {
        return;
    }
    let mut seeds = SeedGen::new(7);
    let q = seeds.unit_quat();
    let q_inv = q.conjugate();

    for &count in POINT_COUNTS {
        let mut group = c.benchmark_group(format!("Rotate {count} points"));
        group.throughput(Throughput::Elements(count as u64));

        let points: Vec<Vec4> = (0..count)
            .map(|_| seeds.vec4(-10.0..10.0).with_w(1.0))
            .collect();

        group.bench_with_input(BenchmarkId::new("sse", count), &points, |b, points| {
            let mut work = points.clone();
            b.iter(|| {
                rotate_points(&q, &q_inv, &mut work);
                black_box(&work);
            })
        });

        group.bench_with_input(BenchmarkId::new("sse fused", count), &points, |b, points| {
            let mut work = points.clone();
            b.iter(|| {
                for p in work.iter_mut() {
                    *p = rotate_point_fused(&q, p);
                }
                black_box(&work);
            })
        });

        group.bench_with_input(BenchmarkId::new("scalar", count), &points, |b, points| {
            let mut work = points.clone();
            b.iter(|| {
                for p in work.iter_mut() {
                    let r = scalar::multiply(&scalar::multiply(&q, &Quat::pure(p)), &q_inv);
                    *p = r.0.with_w(p.w());
                }
                black_box(&work);
            })
        });

        group.finish();
    }
}

criterion_group!(benches, benchmark_product, benchmark_rotation);
criterion_main!(benches);
