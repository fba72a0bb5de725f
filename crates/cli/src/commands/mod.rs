pub mod compare;
pub mod distances;
pub mod init;
pub mod inspect;
pub mod sfs;

use crate::args::AnalysisArgs;
use crate::config::AnalysisConfig;
use anyhow::{Context, Result};
use demeflow_sim::solver::SolverMethod;

/// Apply command-line overrides on top of the configured analysis options.
pub fn apply_analysis_args(
    mut config: AnalysisConfig,
    args: &AnalysisArgs,
) -> Result<AnalysisConfig> {
    if let Some(eps) = args.epsilon {
        config.epsilon = eps;
    }
    if let Some(solver) = &args.solver {
        config.distances.solver.method = solver
            .parse::<SolverMethod>()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid solver")?;
    }
    if let Some(tol) = args.tolerance {
        config.distances.solver.tolerance = tol;
    }
    if let Some(max) = args.max_iterations {
        config.distances.solver.max_iterations = Some(max);
    }
    if args.no_symmetrize {
        config.distances.symmetrize = false;
    }
    if args.no_filter {
        config.filter = false;
    }
    Ok(config)
}
