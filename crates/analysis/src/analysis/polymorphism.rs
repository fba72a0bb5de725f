//! Polymorphism analysis
//!
//! Functions for selecting segregating sites by derived allele frequency.

use crate::errors::AnalysisError;
use demeflow_sim::GenotypeMatrix;
use log::{debug, warn};

/// Drop sites whose derived allele frequency falls outside `[ε, 1 − ε]`.
///
/// # Arguments
///
/// * `y` - Genotype matrix (samples x sites)
/// * `epsilon` - Frequency threshold, in `[0, 0.5]`
///
/// # Returns
///
/// A new matrix with the same samples and the retained sites in their
/// original order. Filtering twice with the same `epsilon` changes nothing.
pub fn filter_rare_variants(
    y: &GenotypeMatrix,
    epsilon: f64,
) -> Result<GenotypeMatrix, AnalysisError> {
    if !(0.0..=0.5).contains(&epsilon) {
        return Err(AnalysisError::Configuration(format!(
            "rare-variant threshold must be in [0, 0.5], got {epsilon}"
        )));
    }
    if y.n_samples() == 0 {
        return Ok(y.clone());
    }

    let keep: Vec<usize> = y
        .derived_allele_frequencies()
        .into_iter()
        .enumerate()
        .filter(|&(_, daf)| daf >= epsilon && daf <= 1.0 - epsilon)
        .map(|(j, _)| j)
        .collect();

    debug!(
        "Rare-variant filter (epsilon = {epsilon}) kept {} of {} sites",
        keep.len(),
        y.n_sites()
    );
    if keep.is_empty() && y.n_sites() > 0 {
        warn!("Rare-variant filter removed every site");
    }
    Ok(y.select_columns(&keep))
}

/// Count sites where both alleles are present.
pub fn segregating_sites(y: &GenotypeMatrix) -> usize {
    let n = y.n_samples();
    y.derived_counts()
        .into_iter()
        .filter(|&c| c > 0 && c < n)
        .count()
}
