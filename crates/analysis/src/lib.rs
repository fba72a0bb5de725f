//! # Analysis Crate
//!
//! Turns genotypes into distances and compares them with the deme-level
//! predictors from `demeflow-sim`: rare-variant filtering, observed genetic
//! distance, the site frequency spectrum, expansion of deme matrices to
//! per-sample matrices, and correlation/regression of the paired series.

pub mod analysis;
pub mod errors;

pub use analysis::{
    correlate, expand, filter_rare_variants, observed_genetic_distance, site_frequency_spectrum,
    ComparisonOptions, ComparisonReport, DistanceComparison, PredictorKind,
};
pub use errors::AnalysisError;
