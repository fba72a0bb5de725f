use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use demeflow_sim::distance::{
    coalescent_expected_distance, random_walk_distance, resistance_distance,
};
use demeflow_sim::habitat::{build_triangular_lattice, Edge};
use demeflow_sim::solver::{SolverMethod, SolverOptions};
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Laplacian of an `n x n` triangular lattice with seeded random rates.
fn random_laplacian(n: usize) -> DMatrix<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let rates: Vec<f64> = (0..6 * n * n).map(|_| rng.random_range(0.05..1.0)).collect();
    let surface = move |edges: &[Edge], _: &DMatrix<f64>| rates[..edges.len()].to_vec();
    build_triangular_lattice(n, n)
        .unwrap()
        .with_surface(&surface)
        .unwrap()
        .laplacian()
        .unwrap()
        .clone()
}

fn bench_covariance_distances(c: &mut Criterion) {
    let mut group = c.benchmark_group("covariance_distances");

    for n in [4, 8, 12] {
        let l = random_laplacian(n);
        let sym = (&l + l.transpose()) * 0.5;
        group.bench_with_input(BenchmarkId::new("resistance", n * n), &sym, |b, sym| {
            b.iter(|| black_box(resistance_distance(black_box(sym)).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("random_walk", n * n), &l, |b, l| {
            b.iter(|| black_box(random_walk_distance(black_box(l)).unwrap()))
        });
    }

    group.finish();
}

fn bench_coalescent(c: &mut Criterion) {
    let mut group = c.benchmark_group("coalescent_expected_distance");
    group.sample_size(10);

    for n in [3, 5, 7] {
        let l = random_laplacian(n);
        for method in [SolverMethod::BiCgStab, SolverMethod::Direct] {
            let options = SolverOptions::new(method, 1e-8);
            group.bench_with_input(
                BenchmarkId::new(method.to_string(), n * n),
                &l,
                |b, l| b.iter(|| black_box(coalescent_expected_distance(l, &options).unwrap())),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_covariance_distances, bench_coalescent);
criterion_main!(benches);
