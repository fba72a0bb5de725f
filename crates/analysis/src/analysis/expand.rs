//! Deme-to-sample expansion
//!
//! Samples are ordered deme-major, so sample `i` belongs to deme `v[i]`
//! where `v` is the membership vector. Deme-level quantities are broadcast
//! to sample level through `v`.

use crate::errors::AnalysisError;
use nalgebra::DMatrix;

/// Membership vector `[0, .., 0, 1, .., 1, ..]` with each deme repeated
/// `samples_per_deme` times.
pub fn membership_vector(demes: usize, samples_per_deme: usize) -> Vec<usize> {
    (0..demes)
        .flat_map(|k| std::iter::repeat_n(k, samples_per_deme))
        .collect()
}

/// Samples per deme for `n` samples spread evenly over `demes` demes.
pub fn samples_per_deme(n: usize, demes: usize) -> Result<usize, AnalysisError> {
    if demes == 0 {
        return Err(AnalysisError::Shape("habitat has no demes".to_string()));
    }
    if n == 0 || n % demes != 0 {
        return Err(AnalysisError::Shape(format!(
            "{n} samples cannot be split evenly over {demes} demes"
        )));
    }
    Ok(n / demes)
}

/// Broadcast a `d x d` deme matrix to the `n x n` sample matrix
/// `result[i][j] = deme_matrix[v[i]][v[j]]`.
pub fn expand(
    deme_matrix: &DMatrix<f64>,
    membership: &[usize],
) -> Result<DMatrix<f64>, AnalysisError> {
    if !deme_matrix.is_square() {
        return Err(AnalysisError::Shape(format!(
            "deme matrix must be square, got {}x{}",
            deme_matrix.nrows(),
            deme_matrix.ncols()
        )));
    }
    let d = deme_matrix.nrows();
    if let Some(&index) = membership.iter().find(|&&k| k >= d) {
        return Err(AnalysisError::Index { index, demes: d });
    }
    let n = membership.len();
    Ok(DMatrix::from_fn(n, n, |i, j| deme_matrix[(membership[i], membership[j])]))
}

/// Repeat each row of a `d x k` per-deme matrix `samples_per_deme` times,
/// giving the `n x k` per-sample matrix.
pub fn expand_rows(per_deme: &DMatrix<f64>, samples_per_deme: usize) -> DMatrix<f64> {
    let n = per_deme.nrows() * samples_per_deme;
    DMatrix::from_fn(n, per_deme.ncols(), |i, k| per_deme[(i / samples_per_deme, k)])
}
