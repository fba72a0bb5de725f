//! Site frequency spectrum
//!
//! Histogram of derived allele counts over segregating sites, alongside the
//! neutral expectation for a panmictic population.

use crate::errors::AnalysisError;
use demeflow_sim::GenotypeMatrix;
use serde::{Deserialize, Serialize};

/// Unfolded site frequency spectrum of `n` samples.
///
/// Entry `k - 1` of every vector refers to sites with `k` derived alleles,
/// for `k = 1..n-1`. Fixed and absent alleles are not counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteFrequencySpectrum {
    pub n_samples: usize,
    /// Derived allele frequency `k / n`
    pub frequencies: Vec<f64>,
    /// Number of sites with `k` derived alleles
    pub counts: Vec<usize>,
    /// Neutral expectation relative to singletons, `1 / k`
    pub expected: Vec<f64>,
}

impl SiteFrequencySpectrum {
    /// Counts relative to the singleton class, comparable with `expected`.
    pub fn normalized(&self) -> Result<Vec<f64>, AnalysisError> {
        match self.counts.first() {
            Some(&singletons) if singletons > 0 => Ok(self
                .counts
                .iter()
                .map(|&c| c as f64 / singletons as f64)
                .collect()),
            _ => Err(AnalysisError::Numerical(
                "no singleton sites to normalize the spectrum by".to_string(),
            )),
        }
    }

    /// Total number of segregating sites in the spectrum.
    pub fn segregating_sites(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Compute the site frequency spectrum of `y`.
pub fn site_frequency_spectrum(y: &GenotypeMatrix) -> SiteFrequencySpectrum {
    let n = y.n_samples();
    let classes = n.saturating_sub(1);
    let mut counts = vec![0usize; classes];
    for c in y.derived_counts() {
        if c >= 1 && c < n {
            counts[c - 1] += 1;
        }
    }
    SiteFrequencySpectrum {
        n_samples: n,
        frequencies: (1..=classes).map(|k| k as f64 / n as f64).collect(),
        counts,
        expected: (1..=classes).map(|k| 1.0 / k as f64).collect(),
    }
}
