use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use demeflow_analysis::analysis::{correlate, expand, membership_vector};
use demeflow_analysis::{filter_rare_variants, observed_genetic_distance};
use demeflow_sim::GenotypeMatrix;
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn random_genotypes(n: usize, p: usize, seed: u64) -> GenotypeMatrix {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let data = (0..n * p).map(|_| u8::from(rng.random_bool(0.3))).collect();
    GenotypeMatrix::new(n, p, data).unwrap()
}

fn bench_genetic_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("observed_genetic_distance");
    group.sample_size(20);

    for n in [50, 100, 200] {
        let y = random_genotypes(n, 1000, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &y, |b, y| {
            b.iter(|| black_box(observed_genetic_distance(black_box(y))))
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let y = random_genotypes(200, 5000, 7);
    c.bench_function("filter_rare_variants", |b| {
        b.iter(|| black_box(filter_rare_variants(black_box(&y), 0.05).unwrap()))
    });
}

fn bench_expand_and_correlate(c: &mut Criterion) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let d = 25;
    let deme = DMatrix::from_fn(d, d, |_, _| rng.random::<f64>());
    let v = membership_vector(d, 10);
    let other = expand(&deme.transpose(), &v).unwrap();

    c.bench_function("expand", |b| {
        b.iter(|| black_box(expand(black_box(&deme), black_box(&v)).unwrap()))
    });
    c.bench_function("correlate", |b| {
        let a = expand(&deme, &v).unwrap();
        b.iter(|| black_box(correlate(black_box(&a), black_box(&other)).unwrap()))
    });
}

criterion_group!(benches, bench_genetic_distance, bench_filter, bench_expand_and_correlate);
criterion_main!(benches);
