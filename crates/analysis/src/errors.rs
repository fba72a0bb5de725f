use demeflow_sim::errors::{GenotypeError, HabitatError};
use thiserror::Error;

/// Errors raised while analysing genotypes against a habitat.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Habitat(#[from] HabitatError),

    #[error(transparent)]
    Genotype(#[from] GenotypeError),

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Index error: deme {index} out of range for {demes} demes")]
    Index { index: usize, demes: usize },

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
