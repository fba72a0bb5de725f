//! All four deme-level predictors computed from one habitat.

use super::{
    coalescent_expected_distance, random_walk_distance, resistance_distance, symmetric_part,
};
use crate::errors::HabitatError;
use crate::habitat::Habitat;
use crate::solver::SolverOptions;
use log::info;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Options shared by the deme-level distance computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceOptions {
    #[serde(default)]
    pub solver: SolverOptions,
    /// Compute resistance distance on `(L + Lᵀ) / 2` instead of `L`.
    #[serde(default = "default_symmetrize")]
    pub symmetrize: bool,
}

fn default_symmetrize() -> bool {
    true
}

impl Default for DistanceOptions {
    fn default() -> Self {
        Self {
            solver: SolverOptions::default(),
            symmetrize: true,
        }
    }
}

impl DistanceOptions {
    pub fn with_solver(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_symmetrize(mut self, symmetrize: bool) -> Self {
        self.symmetrize = symmetrize;
        self
    }
}

/// The four `d x d` predictors of genetic distance between demes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemeDistances {
    pub geographic: DMatrix<f64>,
    pub resistance: DMatrix<f64>,
    pub random_walk: DMatrix<f64>,
    pub coalescent: DMatrix<f64>,
}

impl DemeDistances {
    /// Compute every predictor for a habitat with a migration surface.
    ///
    /// Fails with [`HabitatError::Numerical`] on a disconnected habitat, or
    /// one whose rates drain lineages into separate regions. The
    /// coalescence-time system has no solution for either.
    pub fn compute(habitat: &Habitat, options: &DistanceOptions) -> Result<Self, HabitatError> {
        if !habitat.is_connected()? {
            return Err(HabitatError::Numerical(
                "habitat is disconnected; coalescence times are unbounded".to_string(),
            ));
        }
        if !habitat.lineages_can_meet()? {
            return Err(HabitatError::Numerical(
                "migration drains lineages into separate regions; coalescence times are unbounded"
                    .to_string(),
            ));
        }
        let laplacian = habitat.laplacian()?;
        info!(
            "Computing deme distances for {} demes ({})",
            habitat.demes(),
            habitat.topology()
        );

        let resistance = if options.symmetrize {
            resistance_distance(&symmetric_part(laplacian)?)?
        } else {
            resistance_distance(laplacian)?
        };

        Ok(Self {
            geographic: habitat.geographic_distance(),
            resistance,
            random_walk: random_walk_distance(laplacian)?,
            coalescent: coalescent_expected_distance(laplacian, &options.solver)?,
        })
    }

    pub fn demes(&self) -> usize {
        self.geographic.nrows()
    }
}
