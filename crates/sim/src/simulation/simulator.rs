use super::SimulationParameters;
use crate::base::GenotypeMatrix;
use crate::errors::SimulatorError;
use crate::storage::GenotypeCache;
use log::{debug, info, warn};
use nalgebra::DMatrix;

/// A coalescent simulator with migration between demes.
///
/// Given a `d x d` migration matrix (`M[i][j]` is the backwards-in-time
/// rate from deme `i` to deme `j`), implementations return a binary
/// genotype matrix with `params.samples_per_deme * d` rows, samples of deme
/// 0 first, then deme 1, and so on.
pub trait GenotypeSimulator {
    fn simulate(
        &self,
        migration: &DMatrix<f64>,
        params: &SimulationParameters,
    ) -> Result<GenotypeMatrix, SimulatorError>;
}

impl<S: GenotypeSimulator + ?Sized> GenotypeSimulator for &S {
    fn simulate(
        &self,
        migration: &DMatrix<f64>,
        params: &SimulationParameters,
    ) -> Result<GenotypeMatrix, SimulatorError> {
        (**self).simulate(migration, params)
    }
}

fn check_migration(migration: &DMatrix<f64>) -> Result<(), SimulatorError> {
    if !migration.is_square() || migration.nrows() == 0 {
        return Err(SimulatorError::Shape(format!(
            "migration matrix must be square and non-empty, got {}x{}",
            migration.nrows(),
            migration.ncols()
        )));
    }
    Ok(())
}

fn check_output(
    genotypes: &GenotypeMatrix,
    expected_rows: usize,
) -> Result<(), SimulatorError> {
    if genotypes.n_samples() != expected_rows {
        return Err(SimulatorError::Shape(format!(
            "expected {expected_rows} samples, simulator returned {}",
            genotypes.n_samples()
        )));
    }
    Ok(())
}

/// Run `simulator` after validating its inputs, then check the number of
/// returned samples.
pub fn simulate_checked<S: GenotypeSimulator + ?Sized>(
    simulator: &S,
    migration: &DMatrix<f64>,
    params: &SimulationParameters,
) -> Result<GenotypeMatrix, SimulatorError> {
    params.validate()?;
    check_migration(migration)?;
    let genotypes = simulator.simulate(migration, params)?;
    check_output(&genotypes, params.total_samples(migration.nrows()))?;
    debug!(
        "Simulated {} samples x {} sites",
        genotypes.n_samples(),
        genotypes.n_sites()
    );
    Ok(genotypes)
}

/// Memoizes a simulator behind a [`GenotypeCache`].
pub struct CachedSimulator<S, C> {
    simulator: S,
    cache: C,
}

impl<S: GenotypeSimulator, C: GenotypeCache> CachedSimulator<S, C> {
    pub fn new(simulator: S, cache: C) -> Self {
        Self { simulator, cache }
    }

    /// Genotypes for `key`: the cached matrix when present and of the right
    /// size, otherwise a fresh simulation that is then stored.
    pub fn genotypes(
        &mut self,
        key: &str,
        migration: &DMatrix<f64>,
        params: &SimulationParameters,
    ) -> Result<GenotypeMatrix, SimulatorError> {
        check_migration(migration)?;
        let expected = params.total_samples(migration.nrows());

        if let Some(cached) = self.cache.get(key)? {
            if cached.n_samples() == expected {
                debug!("Genotype cache hit for '{key}'");
                return Ok(cached);
            }
            warn!(
                "Cached genotypes for '{key}' have {} samples, expected {expected}; re-simulating",
                cached.n_samples()
            );
        }

        info!("Simulating genotypes for '{key}'");
        let genotypes = simulate_checked(&self.simulator, migration, params)?;
        self.cache.put(key, &genotypes)?;
        Ok(genotypes)
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}
