//! Linear solvers for the pair-indexed coalescence-time system.
//!
//! The systems assembled by [`crate::distance::coalescent`] are sparse (each
//! row touches O(d) of the d(d+1)/2 unknowns) and not symmetric, so the
//! default method is BiCGSTAB. Plain conjugate gradient is kept for
//! symmetric positive-definite systems, and a dense LU path is available
//! for small problems and cross-checking.

mod iterative;
mod sparse;

pub use iterative::{bicgstab, conjugate_gradient, direct, solve};
pub use sparse::CsrMatrix;

use serde::{Deserialize, Serialize};

/// Default relative residual tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Lower bound on the iteration cap when none is configured.
pub const MIN_ITERATIONS: usize = 1000;

/// Which algorithm solves `A x = b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    /// Conjugate gradient. Requires a symmetric positive-definite matrix.
    ConjugateGradient,
    /// Stabilized bi-conjugate gradient. Handles non-symmetric matrices.
    #[default]
    BiCgStab,
    /// Dense LU decomposition.
    Direct,
}

impl std::fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConjugateGradient => write!(f, "cg"),
            Self::BiCgStab => write!(f, "bicgstab"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

impl std::str::FromStr for SolverMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cg" | "conjugate-gradient" => Ok(Self::ConjugateGradient),
            "bicgstab" => Ok(Self::BiCgStab),
            "direct" | "lu" => Ok(Self::Direct),
            _ => Err(format!(
                "Unknown solver method: {s}. Available: cg, bicgstab, direct"
            )),
        }
    }
}

/// Solver configuration: method, convergence tolerance and iteration cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    #[serde(default)]
    pub method: SolverMethod,
    /// Relative residual `‖b − Ax‖ / ‖b‖` at which iteration stops.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap; `None` uses `max(10 * rows, MIN_ITERATIONS)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            method: SolverMethod::default(),
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: None,
        }
    }
}

impl SolverOptions {
    pub fn new(method: SolverMethod, tolerance: f64) -> Self {
        Self {
            method,
            tolerance,
            max_iterations: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Iteration cap for a system with `rows` unknowns.
    pub fn iteration_cap(&self, rows: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| (10 * rows).max(MIN_ITERATIONS))
    }
}

/// Result of a successful solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub solution: nalgebra::DVector<f64>,
    pub iterations: usize,
    /// Final relative residual.
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        assert_eq!("cg".parse::<SolverMethod>().unwrap(), SolverMethod::ConjugateGradient);
        assert_eq!("bicgstab".parse::<SolverMethod>().unwrap(), SolverMethod::BiCgStab);
        assert_eq!("lu".parse::<SolverMethod>().unwrap(), SolverMethod::Direct);
        assert!("gmres".parse::<SolverMethod>().is_err());
    }

    #[test]
    fn test_iteration_cap() {
        let opts = SolverOptions::default();
        assert_eq!(opts.iteration_cap(10), MIN_ITERATIONS);
        assert_eq!(opts.iteration_cap(500), 5000);
        assert_eq!(opts.with_max_iterations(7).iteration_cap(500), 7);
    }

    #[test]
    fn test_options_deserialize_defaults() {
        let opts: SolverOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, SolverOptions::default());
    }
}
