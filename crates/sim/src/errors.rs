use thiserror::Error;

/// Errors raised while building habitats or computing distances between demes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HabitatError {
    /// Matrix dimensions do not match what the operation requires.
    #[error("Shape error: {0}")]
    Shape(String),

    /// A decomposition or linear solve failed, or the problem is ill-posed.
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// A deme id outside `[0, demes)`.
    #[error("Index error: deme {index} out of range for {demes} demes")]
    Index { index: usize, demes: usize },

    /// The habitat is missing a migration surface or was given invalid rates.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<SolverError> for HabitatError {
    fn from(e: SolverError) -> Self {
        Self::Numerical(e.to_string())
    }
}

/// Errors from the iterative and direct linear solvers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("Solver did not converge after {iterations} iterations (relative residual {residual:.3e})")]
    NotConverged { iterations: usize, residual: f64 },

    #[error("Solver breakdown at iteration {iteration}: {reason}")]
    Breakdown {
        iteration: usize,
        reason: &'static str,
    },

    #[error("Dimension mismatch: system has {rows} rows but right-hand side has {len} entries")]
    DimensionMismatch { rows: usize, len: usize },

    #[error("Matrix is singular")]
    Singular,

    #[error("Conjugate gradient needs a symmetric matrix; use bicgstab or direct")]
    NotSymmetric,
}

/// Errors for constructing or parsing genotype matrices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenotypeError {
    #[error("Genotype shape error: {0}")]
    Shape(String),

    #[error("Invalid allele {value} at sample {row}, site {col} (expected 0 or 1)")]
    InvalidAllele { row: usize, col: usize, value: u8 },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Errors from genotype caches.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cache key: '{0}'")]
    InvalidKey(String),

    #[error("Cache entry holds key '{found}', expected '{expected}'")]
    KeyMismatch { expected: String, found: String },
}

/// Errors surfaced by genotype simulators and the caching wrapper around them.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Invalid simulation parameter: {0}")]
    InvalidParameter(String),

    #[error("Simulator returned an unexpected shape: {0}")]
    Shape(String),

    #[error("Simulator backend failed: {0}")]
    Backend(String),

    #[error(transparent)]
    Genotype(#[from] GenotypeError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_becomes_numerical() {
        let err: HabitatError = SolverError::NotConverged {
            iterations: 10,
            residual: 0.5,
        }
        .into();
        match err {
            HabitatError::Numerical(msg) => assert!(msg.contains("10 iterations")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_index_error_display() {
        let err = HabitatError::Index { index: 7, demes: 4 };
        assert_eq!(
            err.to_string(),
            "Index error: deme 7 out of range for 4 demes"
        );
    }
}
