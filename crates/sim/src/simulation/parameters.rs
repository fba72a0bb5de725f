use crate::errors::SimulatorError;
use serde::{Deserialize, Serialize};

/// Parameters handed to a genotype simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Length of each simulated region
    pub chrom_length: f64,
    /// Per-site mutation rate
    pub mutation_rate: f64,
    /// Effective size of each deme
    pub effective_size: f64,
    /// Haploid samples drawn from every deme
    pub samples_per_deme: usize,
    /// Number of independent regions
    pub num_regions: usize,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            chrom_length: 1.0,
            mutation_rate: 1e-3,
            effective_size: 1.0,
            samples_per_deme: 10,
            num_regions: 10_000,
        }
    }
}

impl SimulationParameters {
    pub fn with_samples_per_deme(mut self, samples_per_deme: usize) -> Self {
        self.samples_per_deme = samples_per_deme;
        self
    }

    pub fn with_num_regions(mut self, num_regions: usize) -> Self {
        self.num_regions = num_regions;
        self
    }

    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    /// Number of samples expected for a habitat of `demes` demes.
    pub fn total_samples(&self, demes: usize) -> usize {
        self.samples_per_deme * demes
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        let positive = [
            ("chrom_length", self.chrom_length),
            ("effective_size", self.effective_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimulatorError::InvalidParameter(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.mutation_rate.is_finite() && self.mutation_rate >= 0.0) {
            return Err(SimulatorError::InvalidParameter(format!(
                "mutation_rate must be non-negative, got {}",
                self.mutation_rate
            )));
        }
        if self.samples_per_deme == 0 {
            return Err(SimulatorError::InvalidParameter(
                "samples_per_deme must be at least 1".to_string(),
            ));
        }
        if self.num_regions == 0 {
            return Err(SimulatorError::InvalidParameter(
                "num_regions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = SimulationParameters::default();
        assert_eq!(p.samples_per_deme, 10);
        assert_eq!(p.num_regions, 10_000);
        assert_eq!(p.mutation_rate, 1e-3);
        assert!(p.validate().is_ok());
        assert_eq!(p.total_samples(9), 90);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let p: SimulationParameters = serde_json::from_str(r#"{"samples_per_deme": 4}"#).unwrap();
        assert_eq!(p.samples_per_deme, 4);
        assert_eq!(p.chrom_length, 1.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = SimulationParameters::default();
        assert!(base.with_samples_per_deme(0).validate().is_err());
        assert!(base.with_num_regions(0).validate().is_err());
        assert!(base.with_mutation_rate(-1.0).validate().is_err());
        let p = SimulationParameters {
            effective_size: 0.0,
            ..base
        };
        assert!(matches!(p.validate(), Err(SimulatorError::InvalidParameter(_))));
    }
}
