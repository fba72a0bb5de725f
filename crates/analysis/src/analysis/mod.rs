//! Genotype analysis tools for demeflow
//!
//! This module provides:
//! - Deme-to-sample expansion of deme-level matrices
//! - Rare-variant filtering and the site frequency spectrum
//! - Observed genetic distance and PCA input normalization
//! - Pearson correlation and least-squares fits over distance pairs
//! - The end-to-end predictor comparison

pub mod comparison;
pub mod correlation;
pub mod distance;
pub mod expand;
pub mod frequency;
pub mod polymorphism;
pub mod utils;

// Re-export commonly used functions
pub use comparison::{
    ComparisonOptions, ComparisonReport, DistanceComparison, PredictorComparison, PredictorKind,
};
pub use correlation::{correlate, linear_fit, lower_triangle, pearson, LinearFit};
pub use distance::{observed_genetic_distance, standardize_genotypes};
pub use expand::{expand, expand_rows, membership_vector, samples_per_deme};
pub use frequency::{site_frequency_spectrum, SiteFrequencySpectrum};
pub use polymorphism::{filter_rare_variants, segregating_sites};
