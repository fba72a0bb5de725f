//! Correlation and regression over pairs of samples
//!
//! Distance matrices are compared through their strictly lower-triangular
//! entries, which list every unordered pair of samples once.

use crate::analysis::utils::mean;
use crate::errors::AnalysisError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Entries `m[i][j]` with `i > j`, row by row.
pub fn lower_triangle(m: &DMatrix<f64>) -> Result<Vec<f64>, AnalysisError> {
    if !m.is_square() {
        return Err(AnalysisError::Shape(format!(
            "expected a square matrix, got {}x{}",
            m.nrows(),
            m.ncols()
        )));
    }
    let n = m.nrows();
    Ok((0..n)
        .flat_map(|i| (0..i).map(move |j| m[(i, j)]))
        .collect())
}

fn centered_moments(x: &[f64], y: &[f64]) -> Result<(f64, f64, f64), AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::Shape(format!(
            "series lengths differ: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(AnalysisError::Numerical(format!(
            "need at least 2 pairs, got {}",
            x.len()
        )));
    }
    let (mx, my) = (mean(x), mean(y));
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    Ok((sxx, syy, sxy))
}

/// Pearson correlation of two series.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, AnalysisError> {
    let (sxx, syy, sxy) = centered_moments(x, y)?;
    if sxx == 0.0 || syy == 0.0 {
        return Err(AnalysisError::Numerical(
            "correlation is undefined for a constant series".to_string(),
        ));
    }
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pearson correlation of two distance matrices over their lower triangles.
pub fn correlate(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64, AnalysisError> {
    if a.shape() != b.shape() {
        return Err(AnalysisError::Shape(format!(
            "cannot correlate {}x{} with {}x{}",
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols()
        )));
    }
    pearson(&lower_triangle(a)?, &lower_triangle(b)?)
}

/// Ordinary least-squares line through `(x, y)`.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit, AnalysisError> {
    let (sxx, _, sxy) = centered_moments(x, y)?;
    if sxx == 0.0 {
        return Err(AnalysisError::Numerical(
            "cannot fit a line to a constant predictor".to_string(),
        ));
    }
    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean(y) - slope * mean(x),
    })
}
