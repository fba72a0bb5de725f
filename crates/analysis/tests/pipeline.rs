//! Integration tests for the simulate-then-compare workflow.

use demeflow_analysis::analysis::{site_frequency_spectrum, standardize_genotypes};
use demeflow_analysis::{
    filter_rare_variants, AnalysisError, ComparisonOptions, DistanceComparison, PredictorKind,
};
use demeflow_sim::errors::SimulatorError;
use demeflow_sim::habitat::{HabitatConfig, SurfaceConfig, Topology};
use demeflow_sim::simulation::{CachedSimulator, GenotypeSimulator, SimulationParameters};
use demeflow_sim::storage::MemoryCache;
use demeflow_sim::GenotypeMatrix;
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Toy stand-in for a coalescent simulator on a line: each site's derived
/// allele is carried by a run of neighbouring demes.
struct NeighbourhoodSimulator {
    seed: u64,
}

impl GenotypeSimulator for NeighbourhoodSimulator {
    fn simulate(
        &self,
        migration: &DMatrix<f64>,
        params: &SimulationParameters,
    ) -> Result<GenotypeMatrix, SimulatorError> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        let d = migration.nrows();
        let spd = params.samples_per_deme;
        let p = params.num_regions;
        let mut data = vec![0u8; d * spd * p];
        for site in 0..p {
            let center = rng.random_range(0..d);
            let radius = rng.random_range(0..=d / 2);
            for deme in center.saturating_sub(radius)..(center + radius + 1).min(d) {
                for s in 0..spd {
                    if rng.random_bool(0.9) {
                        data[(deme * spd + s) * p + site] = 1;
                    }
                }
            }
        }
        Ok(GenotypeMatrix::new(d * spd, p, data)?)
    }
}

fn line_config() -> HabitatConfig {
    HabitatConfig::new(Topology::Line { demes: 6 }, SurfaceConfig::Uniform { rate: 0.2 })
}

#[test]
fn test_simulate_and_compare() {
    let habitat = line_config().build().unwrap();
    let params = SimulationParameters::default()
        .with_samples_per_deme(4)
        .with_num_regions(400);

    let mut simulator =
        CachedSimulator::new(NeighbourhoodSimulator { seed: 7 }, MemoryCache::new());
    let y = simulator
        .genotypes("line6", habitat.migration_matrix().unwrap(), &params)
        .unwrap();
    assert_eq!(y.shape(), (24, 400));

    let comparison = DistanceComparison::new(&habitat, ComparisonOptions::default()).unwrap();
    let report = comparison.run(&y).unwrap();
    assert_eq!(report.samples_per_deme, 4);
    assert!(report.sites_after_filter <= report.sites_before_filter);

    for kind in PredictorKind::ALL {
        let r = report.get(kind).unwrap().correlation.unwrap();
        assert!(r > 0.4, "{kind}: r = {r}");
    }

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"random_walk\""));
}

#[test]
fn test_report_is_reproducible() {
    let habitat = line_config().build().unwrap();
    let params = SimulationParameters::default()
        .with_samples_per_deme(2)
        .with_num_regions(100);
    let sim = NeighbourhoodSimulator { seed: 11 };
    let y = sim.simulate(habitat.migration_matrix().unwrap(), &params).unwrap();

    let comparison = DistanceComparison::new(&habitat, ComparisonOptions::default()).unwrap();
    assert_eq!(comparison.run(&y).unwrap(), comparison.run(&y).unwrap());
}

#[test]
fn test_genotype_summaries() {
    let habitat = line_config().build().unwrap();
    let params = SimulationParameters::default()
        .with_samples_per_deme(3)
        .with_num_regions(200);
    let y = NeighbourhoodSimulator { seed: 3 }
        .simulate(habitat.migration_matrix().unwrap(), &params)
        .unwrap();

    let sfs = site_frequency_spectrum(&y);
    assert_eq!(sfs.counts.len(), 17);
    assert!(sfs.segregating_sites() <= 200);

    let filtered = filter_rare_variants(&y, 0.1).unwrap();
    let z = standardize_genotypes(&filtered);
    assert_eq!(z.shape(), filtered.shape());
}

#[test]
fn test_mismatched_habitat_and_genotypes() {
    let habitat = line_config().build().unwrap();
    let comparison = DistanceComparison::new(&habitat, ComparisonOptions::default()).unwrap();
    let y = GenotypeMatrix::from_rows(&vec![vec![0, 1]; 7]).unwrap();
    assert!(matches!(comparison.run(&y), Err(AnalysisError::Shape(_))));
}
