//! Predictor comparison
//!
//! Runs the full pipeline for one habitat and one genotype matrix: filter
//! rare variants, compute the observed genetic distance, broadcast every
//! deme-level predictor to sample level and report how well each one
//! explains genetic distance.

use crate::analysis::correlation::{linear_fit, lower_triangle, pearson, LinearFit};
use crate::analysis::distance::observed_genetic_distance;
use crate::analysis::expand::{expand, expand_rows, membership_vector, samples_per_deme};
use crate::analysis::polymorphism::filter_rare_variants;
use crate::errors::AnalysisError;
use demeflow_sim::distance::{geographic_distance, DemeDistances, DistanceOptions};
use demeflow_sim::{GenotypeMatrix, Habitat};
use log::{info, warn};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Default rare-variant threshold.
pub const DEFAULT_EPSILON: f64 = 0.05;

/// A theoretical predictor of genetic distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    Geographic,
    Resistance,
    RandomWalk,
    Coalescent,
}

impl PredictorKind {
    pub const ALL: [PredictorKind; 4] = [
        PredictorKind::Geographic,
        PredictorKind::Resistance,
        PredictorKind::RandomWalk,
        PredictorKind::Coalescent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Geographic => "Geographic Distance",
            Self::Resistance => "Resistance Distance",
            Self::RandomWalk => "Random Walk Distance",
            Self::Coalescent => "Expected Coalescence Time",
        }
    }
}

impl std::fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Geographic => "geographic",
            Self::Resistance => "resistance",
            Self::RandomWalk => "random_walk",
            Self::Coalescent => "coalescent",
        };
        write!(f, "{name}")
    }
}

/// Pipeline options. The distance options are flattened so the JSON form
/// reads `{epsilon, solver, symmetrize, filter}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Rare-variant threshold
    pub epsilon: f64,
    #[serde(flatten)]
    pub distances: DistanceOptions,
    /// Apply the rare-variant filter before computing genetic distance
    pub filter: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            distances: DistanceOptions::default(),
            filter: true,
        }
    }
}

impl ComparisonOptions {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_distances(mut self, distances: DistanceOptions) -> Self {
        self.distances = distances;
        self
    }
}

/// How one predictor relates to genetic distance.
///
/// `correlation` and `fit` are `None` when they are undefined, for example
/// when the predictor is constant over all pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorComparison {
    pub predictor: PredictorKind,
    pub correlation: Option<f64>,
    pub fit: Option<LinearFit>,
    /// `(predicted, genetic)` for every unordered pair of samples
    pub pairs: Vec<(f64, f64)>,
}

/// Result of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub demes: usize,
    pub samples_per_deme: usize,
    pub n_samples: usize,
    pub sites_before_filter: usize,
    pub sites_after_filter: usize,
    pub epsilon: f64,
    /// `n x 2` coordinates of each sample (its deme's position)
    pub sample_positions: DMatrix<f64>,
    pub comparisons: Vec<PredictorComparison>,
}

impl ComparisonReport {
    pub fn get(&self, kind: PredictorKind) -> Option<&PredictorComparison> {
        self.comparisons.iter().find(|c| c.predictor == kind)
    }

    /// Predictor with the highest correlation.
    pub fn best(&self) -> Option<&PredictorComparison> {
        self.comparisons
            .iter()
            .filter(|c| c.correlation.is_some())
            .max_by(|a, b| {
                a.correlation
                    .partial_cmp(&b.correlation)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Compares genotype data against the predictors of one habitat.
///
/// Deme-level distances are computed once at construction and reused for
/// every genotype matrix passed to [`DistanceComparison::run`].
#[derive(Debug, Clone)]
pub struct DistanceComparison<'a> {
    habitat: &'a Habitat,
    distances: DemeDistances,
    options: ComparisonOptions,
}

impl<'a> DistanceComparison<'a> {
    pub fn new(habitat: &'a Habitat, options: ComparisonOptions) -> Result<Self, AnalysisError> {
        if !(0.0..=0.5).contains(&options.epsilon) {
            return Err(AnalysisError::Configuration(format!(
                "rare-variant threshold must be in [0, 0.5], got {}",
                options.epsilon
            )));
        }
        let distances = DemeDistances::compute(habitat, &options.distances)?;
        Ok(Self {
            habitat,
            distances,
            options,
        })
    }

    pub fn deme_distances(&self) -> &DemeDistances {
        &self.distances
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    /// Run the comparison for a deme-major genotype matrix.
    pub fn run(&self, genotypes: &GenotypeMatrix) -> Result<ComparisonReport, AnalysisError> {
        let d = self.habitat.demes();
        let spd = samples_per_deme(genotypes.n_samples(), d)?;

        let y = if self.options.filter {
            filter_rare_variants(genotypes, self.options.epsilon)?
        } else {
            genotypes.clone()
        };
        info!(
            "Comparing {} samples over {} sites ({} before filtering) with {d} demes",
            y.n_samples(),
            y.n_sites(),
            genotypes.n_sites()
        );

        let genetic = lower_triangle(&observed_genetic_distance(&y))?;
        let membership = membership_vector(d, spd);
        let sample_positions = expand_rows(self.habitat.positions(), spd);

        let mut comparisons = Vec::with_capacity(PredictorKind::ALL.len());
        for kind in PredictorKind::ALL {
            let predicted = match kind {
                PredictorKind::Geographic => geographic_distance(&sample_positions),
                PredictorKind::Resistance => expand(&self.distances.resistance, &membership)?,
                PredictorKind::RandomWalk => expand(&self.distances.random_walk, &membership)?,
                PredictorKind::Coalescent => expand(&self.distances.coalescent, &membership)?,
            };
            comparisons.push(compare(kind, &lower_triangle(&predicted)?, &genetic));
        }

        Ok(ComparisonReport {
            demes: d,
            samples_per_deme: spd,
            n_samples: y.n_samples(),
            sites_before_filter: genotypes.n_sites(),
            sites_after_filter: y.n_sites(),
            epsilon: self.options.epsilon,
            sample_positions,
            comparisons,
        })
    }
}

fn compare(kind: PredictorKind, predicted: &[f64], genetic: &[f64]) -> PredictorComparison {
    let correlation = match pearson(predicted, genetic) {
        Ok(r) => Some(r),
        Err(e) => {
            warn!("No correlation for {kind}: {e}");
            None
        }
    };
    PredictorComparison {
        predictor: kind,
        correlation,
        fit: linear_fit(predicted, genetic).ok(),
        pairs: predicted.iter().copied().zip(genetic.iter().copied()).collect(),
    }
}
