//! The master configuration file.

use anyhow::{Context, Result};
use demeflow_analysis::ComparisonOptions;
use demeflow_sim::habitat::HabitatConfig;
use demeflow_sim::simulation::SimulationParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for the comparison pipeline.
pub type AnalysisConfig = ComparisonOptions;

/// The master configuration struct.
/// Can be read from a file to fully reproduce a habitat and its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub habitat: HabitatConfig,
    #[serde(default)]
    pub simulation: SimulationParameters,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let config: Configuration = serde_json::from_str(&text)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write configuration {}", path.display()))
    }

    /// Check everything that can be checked without building the habitat.
    pub fn validate(&self) -> Result<()> {
        self.simulation
            .validate()
            .context("Invalid simulation parameters")?;
        let eps = self.analysis.epsilon;
        if !(0.0..=0.5).contains(&eps) {
            anyhow::bail!("analysis.epsilon must be in [0, 0.5], got {eps}");
        }
        let tol = self.analysis.distances.solver.tolerance;
        if !(tol.is_finite() && tol >= 0.0) {
            anyhow::bail!("analysis.solver.tolerance must be non-negative, got {tol}");
        }
        Ok(())
    }
}
