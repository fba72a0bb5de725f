//! End-to-end tests from configuration to deme-level distances.

use demeflow_sim::distance::{
    coalescent_expected_distance, resistance_distance, DemeDistances, DistanceOptions,
};
use demeflow_sim::habitat::{HabitatConfig, SurfaceConfig, Topology};
use demeflow_sim::solver::{SolverMethod, SolverOptions};
use demeflow_sim::storage::{GenotypeCache, JsonFileCache};
use demeflow_sim::GenotypeMatrix;
use nalgebra::DMatrix;
use tempfile::TempDir;

fn ring(rate: f64) -> HabitatConfig {
    HabitatConfig::new(Topology::Circle { demes: 4 }, SurfaceConfig::Uniform { rate })
}

#[test]
fn test_ring_distances_from_config() {
    let habitat = ring(0.1).build().unwrap();
    let dist = DemeDistances::compute(&habitat, &DistanceOptions::default()).unwrap();

    for i in 0..4 {
        assert_eq!(dist.resistance[(i, i)], 0.0);
        assert!((dist.resistance[(i, (i + 1) % 4)] - 7.5).abs() < 1e-9);
        assert!((dist.resistance[(i, (i + 2) % 4)] - 10.0).abs() < 1e-9);
    }
    // every deme is equivalent on a ring
    let within = dist.coalescent[(0, 0)];
    for i in 1..4 {
        assert!((dist.coalescent[(i, i)] - within).abs() < 1e-6);
    }
    assert!(dist.coalescent[(0, 2)] > dist.coalescent[(0, 1)]);
}

#[test]
fn test_config_json_roundtrip_builds_same_habitat() {
    let config = HabitatConfig::new(
        Topology::TriangularLattice { rows: 3, cols: 3 },
        SurfaceConfig::QuadraticBarrier {
            m_min: 0.05,
            m_max: 1.0,
        },
    );
    let json = serde_json::to_string(&config).unwrap();
    let parsed: HabitatConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);

    let a = config.build().unwrap();
    let b = parsed.build().unwrap();
    assert_eq!(a.migration_matrix().unwrap(), b.migration_matrix().unwrap());
    assert!(a.summary().unwrap().connected);
}

#[test]
fn test_solvers_agree_on_lattice() {
    let habitat = HabitatConfig::new(
        Topology::SquareLattice { rows: 3, cols: 4 },
        SurfaceConfig::Uniform { rate: 0.3 },
    )
    .build()
    .unwrap();
    let l = habitat.laplacian().unwrap();
    let reference =
        coalescent_expected_distance(l, &SolverOptions::new(SolverMethod::Direct, 0.0)).unwrap();
    let iterative =
        coalescent_expected_distance(l, &SolverOptions::new(SolverMethod::BiCgStab, 1e-11))
            .unwrap();
    for (a, b) in reference.iter().zip(iterative.iter()) {
        assert!((a - b).abs() <= 1e-6 * a.abs().max(1.0));
    }
}

#[test]
fn test_explicit_migration_matrix() {
    let mut habitat = Topology::Line { demes: 3 }.build().unwrap();
    let m = DMatrix::from_row_slice(3, 3, &[0.0, 0.5, 0.0, 0.5, 0.0, 0.5, 0.0, 0.5, 0.0]);
    habitat.set_migration_matrix(m).unwrap();
    let r = resistance_distance(habitat.laplacian().unwrap()).unwrap();
    assert!((r[(0, 2)] - 4.0).abs() < 1e-9);
}

#[test]
fn test_genotype_cache_directory() {
    let dir = TempDir::new().unwrap();
    let y = GenotypeMatrix::parse_text("0 1 1\n1 1 0\n").unwrap();
    let mut cache = JsonFileCache::new(dir.path()).unwrap();
    cache.put("ring m=0.1", &y).unwrap();
    assert_eq!(cache.get("ring m=0.1").unwrap(), Some(y));
}
