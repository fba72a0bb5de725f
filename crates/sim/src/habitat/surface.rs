//! Migration surfaces: strategies that turn a habitat's edges and deme
//! positions into per-edge migration rates.

use super::Edge;
use crate::errors::HabitatError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Assigns a migration rate to every directed edge of a habitat.
///
/// Implementations receive the edges in graph order and the `d x 2`
/// position matrix, and must return exactly one rate per edge. Plain
/// closures of type `Fn(&[Edge], &DMatrix<f64>) -> Vec<f64>` qualify.
pub trait MigrationSurface {
    fn rates(&self, edges: &[Edge], positions: &DMatrix<f64>) -> Result<Vec<f64>, HabitatError>;
}

impl<F> MigrationSurface for F
where
    F: Fn(&[Edge], &DMatrix<f64>) -> Vec<f64>,
{
    fn rates(&self, edges: &[Edge], positions: &DMatrix<f64>) -> Result<Vec<f64>, HabitatError> {
        Ok(self(edges, positions))
    }
}

/// The same rate on every edge in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformMigration {
    pub rate: f64,
}

impl UniformMigration {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl MigrationSurface for UniformMigration {
    fn rates(&self, edges: &[Edge], _positions: &DMatrix<f64>) -> Result<Vec<f64>, HabitatError> {
        Ok(vec![self.rate; edges.len()])
    }
}

/// `rate` on edges from a lower to a higher dense index, zero otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsymmetricUniformMigration {
    pub rate: f64,
}

impl AsymmetricUniformMigration {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl MigrationSurface for AsymmetricUniformMigration {
    fn rates(&self, edges: &[Edge], _positions: &DMatrix<f64>) -> Result<Vec<f64>, HabitatError> {
        Ok(edges
            .iter()
            .map(|e| if e.source < e.target { self.rate } else { 0.0 })
            .collect())
    }
}

/// Smooth barrier along the first coordinate.
///
/// With `x_max` the largest x coordinate, `x_med = median(x) + 0.25` and
/// `mu` the mean x of an edge's endpoints, the rate is
/// `(x_max / x_med^2) * (mu - x_med)^2 + m_min`, capped at `m_max`. Rates
/// are lowest near the middle of the habitat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticBarrier {
    pub m_min: f64,
    pub m_max: f64,
}

impl QuadraticBarrier {
    pub fn new(m_min: f64, m_max: f64) -> Self {
        Self { m_min, m_max }
    }
}

impl MigrationSurface for QuadraticBarrier {
    fn rates(&self, edges: &[Edge], positions: &DMatrix<f64>) -> Result<Vec<f64>, HabitatError> {
        if positions.nrows() == 0 {
            return Ok(Vec::new());
        }
        if self.m_min > self.m_max {
            return Err(HabitatError::Configuration(format!(
                "barrier m_min ({}) exceeds m_max ({})",
                self.m_min, self.m_max
            )));
        }

        let x: Vec<f64> = positions.column(0).iter().copied().collect();
        let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let x_med = median(&x) + 0.25;
        if x_med == 0.0 {
            return Err(HabitatError::Configuration(
                "barrier center is at zero; shift the habitat coordinates".to_string(),
            ));
        }
        let scale = x_max / (x_med * x_med);

        Ok(edges
            .iter()
            .map(|e| {
                let mu = 0.5 * (x[e.source] + x[e.target]);
                let m = scale * (mu - x_med).powi(2) + self.m_min;
                m.min(self.m_max)
            })
            .collect())
    }
}

/// Median with the mean of the two middle values for even lengths.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Serializable choice of built-in surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceConfig {
    Uniform { rate: f64 },
    AsymmetricUniform { rate: f64 },
    QuadraticBarrier { m_min: f64, m_max: f64 },
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::Uniform { rate: 0.1 }
    }
}

impl MigrationSurface for SurfaceConfig {
    fn rates(&self, edges: &[Edge], positions: &DMatrix<f64>) -> Result<Vec<f64>, HabitatError> {
        match *self {
            Self::Uniform { rate } => UniformMigration::new(rate).rates(edges, positions),
            Self::AsymmetricUniform { rate } => {
                AsymmetricUniformMigration::new(rate).rates(edges, positions)
            }
            Self::QuadraticBarrier { m_min, m_max } => {
                QuadraticBarrier::new(m_min, m_max).rates(edges, positions)
            }
        }
    }
}

impl std::fmt::Display for SurfaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uniform { rate } => write!(f, "uniform (m = {rate})"),
            Self::AsymmetricUniform { rate } => write!(f, "asymmetric uniform (m = {rate})"),
            Self::QuadraticBarrier { m_min, m_max } => {
                write!(f, "quadratic barrier (m in [{m_min}, {m_max}])")
            }
        }
    }
}
