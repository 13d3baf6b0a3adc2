//! Vector × matrix throughput per tier, plus the iterative harness.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::{Array1, Array2};

use quadlane::harness::{self, HarnessConfig};
use quadlane::{multiply, multiply_batch, DotLanes, Mat4, SeedGen, Tier, Vec4};

const BATCH_SIZES: &[usize] = &[1, 2, 15, 16, 1_024, 65_536];

fn generate_problems(len: usize) -> Vec<(Vec4, Mat4)> {
    let mut seeds = SeedGen::new(42);
    (0..len)
        .map(|_| (seeds.vec4(-1.0..1.0), seeds.mat4(-1.0..1.0)))
        .collect()
}

fn benchmark_single_problem(c: &mut Criterion) {
    let mut group = c.benchmark_group("VecMat4 single");
    let (vec, mat) = generate_problems(1)[0];

    for tier in Tier::available() {
        group.bench_with_input(BenchmarkId::new("multiply", tier), &tier, |b, &tier| {
            b.iter(|| black_box(multiply(tier, black_box(&vec), black_box(&mat))))
        });
    }

    let nd_vec = Array1::from(vec.to_array().to_vec());
    let nd_mat = Array2::from_shape_fn((4, 4), |(i, j)| mat[i][j]);
    group.bench_function("ndarray_dot", |b| {
        b.iter(|| black_box(black_box(&nd_vec).dot(black_box(&nd_mat))))
    });

    group.finish();
}

fn benchmark_batches(c: &mut Criterion) {
    for &size in BATCH_SIZES {
        let mut group = c.benchmark_group(format!("VecMat4 batch {size}"));
        group.throughput(Throughput::Elements(size as u64));

        let problems = generate_problems(size);
        let mut out = vec![Vec4::ZERO; size];

        for tier in [Tier::Scalar, Tier::Sse, Tier::Fma] {
            if !tier.is_supported() {
                continue;
            }
            group.bench_with_input(BenchmarkId::new(tier.name(), size), &problems, |b, p| {
                b.iter(|| {
                    for ((vec, mat), slot) in p.iter().zip(out.iter_mut()) {
                        *slot = multiply(tier, vec, mat);
                    }
                    black_box(&out);
                })
            });
        }

        if Tier::DualFma.is_supported() {
            group.bench_with_input(BenchmarkId::new("dual", size), &problems, |b, p| {
                b.iter(|| black_box(multiply_batch(p, &mut out)))
            });
        }

        group.finish();
    }
}

fn benchmark_harness(c: &mut Criterion) {
    let mut group = c.benchmark_group("Harness 1000 iterations");
    let config = HarnessConfig::default();

    for tier in Tier::available() {
        group.bench_with_input(BenchmarkId::new("run", tier), &tier, |b, &tier| {
            b.iter(|| black_box(harness::run(tier, black_box(&config))))
        });
    }

    for lanes in [DotLanes::Three, DotLanes::Four] {
        group.bench_with_input(
            BenchmarkId::new("dot scalar", lanes.count()),
            &lanes,
            |b, &lanes| b.iter(|| black_box(harness::run_dot(Tier::Scalar, 1000, lanes))),
        );
        if Tier::Sse.is_supported() {
            group.bench_with_input(
                BenchmarkId::new("dot sse", lanes.count()),
                &lanes,
                |b, &lanes| b.iter(|| black_box(harness::run_dot(Tier::Sse, 1000, lanes))),
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_problem,
    benchmark_batches,
    benchmark_harness
);
criterion_main!(benches);
