//! Criterion benchmarks for hypervolume and non-dominated filtering.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use moebench_core::dominance::{non_dominated, TiePolicy};
use moebench_core::hypervolume::hypervolume;

/// `n` mutually non-dominated points on the simplex `Σ x = 1`.
fn simplex_front(n: usize, objectives: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let raw: Vec<f64> = (0..objectives).map(|_| rng.gen::<f64>() + 1e-9).collect();
            let sum: f64 = raw.iter().sum();
            raw.into_iter().map(|x| x / sum).collect()
        })
        .collect()
}

fn random_cloud(n: usize, objectives: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..objectives).map(|_| rng.gen::<f64>()).collect())
        .collect()
}

fn bench_hypervolume(c: &mut Criterion) {
    for objectives in [2usize, 3, 4] {
        let reference = vec![1.1; objectives];
        let mut group = c.benchmark_group(format!("Hypervolume{objectives}D"));
        for n in [10usize, 50, 100] {
            let front = simplex_front(n, objectives, 7);
            group.bench_with_input(BenchmarkId::from_parameter(n), &front, |b, front| {
                b.iter(|| hypervolume(front, &reference));
            });
        }
        group.finish();
    }
}

fn bench_non_dominated(c: &mut Criterion) {
    let mut group = c.benchmark_group("NonDominated");
    for n in [100usize, 1_000, 5_000] {
        let cloud = random_cloud(n, 3, 11);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cloud, |b, cloud| {
            b.iter(|| non_dominated(cloud, TiePolicy::KeepAll));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hypervolume, bench_non_dominated);
criterion_main!(benches);
