//! Utility functions for analysis module
//!
//! Shared helper functions used across analysis submodules.

use demeflow_sim::GenotypeMatrix;

/// Calculate mean of a slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Per-site mean of a genotype matrix (the derived allele frequency).
#[inline]
pub fn column_means(y: &GenotypeMatrix) -> Vec<f64> {
    y.derived_allele_frequencies()
}

/// Per-site variance of a genotype matrix with `ddof` delta degrees of
/// freedom.
///
/// For binary data with `c` derived alleles among `n` samples the sum of
/// squared deviations is `c (n - c) / n`.
pub fn column_variances(y: &GenotypeMatrix, ddof: usize) -> Vec<f64> {
    let n = y.n_samples();
    if n <= ddof {
        return vec![0.0; y.n_sites()];
    }
    y.derived_counts()
        .into_iter()
        .map(|c| (c * (n - c)) as f64 / n as f64 / (n - ddof) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_column_variances() {
        let y = GenotypeMatrix::from_rows(&[
            vec![0, 1, 1],
            vec![1, 1, 0],
            vec![0, 0, 1],
            vec![1, 1, 1],
        ])
        .unwrap();
        // counts [2, 3, 3] of 4: c (n - c) / n / (n - ddof)
        let vars = column_variances(&y, 1);
        assert!((vars[0] - 1.0 / 3.0).abs() < 1e-15);
        assert!((vars[1] - 0.25).abs() < 1e-15);
        assert!((vars[2] - 0.25).abs() < 1e-15);
        assert_eq!(column_variances(&y, 0)[0], 0.25);
        assert_eq!(column_variances(&y, 4), vec![0.0; 3]);
        assert_eq!(column_means(&y), vec![0.5, 0.75, 0.75]);
    }
}
