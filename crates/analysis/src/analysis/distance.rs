//! Distance calculations for genotypes
//!
//! Observed genetic distance between samples, and the per-site
//! standardization used as principal component input.

use crate::analysis::utils::{column_means, column_variances};
use demeflow_sim::GenotypeMatrix;
use log::debug;
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Observed genetic distance between every pair of samples.
///
/// Each site is centred by its mean and the rows are compared with the
/// standardized Euclidean distance (per-site sample variance, ddof = 1).
/// The result is divided by the number of sites `p`. Monomorphic sites
/// have zero variance and contribute nothing; `p = 0` yields a zero matrix.
///
/// Rows are computed in parallel. Every entry is computed with the same
/// operation order, so the result is exactly symmetric and independent of
/// the thread count.
pub fn observed_genetic_distance(y: &GenotypeMatrix) -> DMatrix<f64> {
    let (n, p) = y.shape();
    if p == 0 {
        return DMatrix::zeros(n, n);
    }

    let means = column_means(y);
    let sites: Vec<(usize, f64)> = column_variances(y, 1)
        .into_iter()
        .enumerate()
        .filter(|&(_, var)| var > 0.0)
        .map(|(j, var)| (j, 1.0 / var))
        .collect();
    debug!(
        "Genetic distance over {n} samples: {} of {p} sites polymorphic",
        sites.len()
    );

    let centered: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let row = y.row(i);
            sites
                .iter()
                .map(|&(j, _)| row[j] as f64 - means[j])
                .collect()
        })
        .collect();
    let weights: Vec<f64> = sites.iter().map(|&(_, w)| w).collect();

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .map(|j| {
                    let sq: f64 = centered[i]
                        .iter()
                        .zip(&centered[j])
                        .zip(&weights)
                        .map(|((a, b), w)| (a - b) * (a - b) * w)
                        .sum();
                    sq.sqrt() / p as f64
                })
                .collect()
        })
        .collect();

    DMatrix::from_fn(n, n, |i, j| rows[i][j])
}

/// Standardize each site to zero mean and unit variance (ddof = 0).
///
/// Monomorphic sites are left at zero.
pub fn standardize_genotypes(y: &GenotypeMatrix) -> DMatrix<f64> {
    let means = column_means(y);
    let stds: Vec<f64> = column_variances(y, 0).into_iter().map(f64::sqrt).collect();
    let mut z = y.to_dmatrix();
    for (j, mut col) in z.column_iter_mut().enumerate() {
        if stds[j] > 0.0 {
            col.apply(|v| *v = (*v - means[j]) / stds[j]);
        } else {
            col.fill(0.0);
        }
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> GenotypeMatrix {
        GenotypeMatrix::from_rows(&[
            vec![0, 1, 1],
            vec![1, 1, 0],
            vec![0, 0, 1],
            vec![1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_genetic_distance_values() {
        let d = observed_genetic_distance(&example());
        // variances (ddof = 1): 1/3, 1/4, 1/4
        let expected_01 = (3.0f64 * 1.0 + 0.0 + 4.0 * 1.0).sqrt() / 3.0;
        assert!((d[(0, 1)] - expected_01).abs() < 1e-12);
        let expected_03 = (3.0f64).sqrt() / 3.0;
        assert!((d[(0, 3)] - expected_03).abs() < 1e-12);
    }

    #[test]
    fn test_genetic_distance_symmetric() {
        let d = observed_genetic_distance(&example());
        for i in 0..4 {
            assert_eq!(d[(i, i)], 0.0);
            for j in 0..4 {
                assert_eq!(d[(i, j)], d[(j, i)]);
            }
        }
    }

    #[test]
    fn test_monomorphic_sites_skipped() {
        let y = GenotypeMatrix::from_rows(&[vec![1, 0, 1], vec![1, 1, 1]]).unwrap();
        let d = observed_genetic_distance(&y);
        assert!(d.iter().all(|v| v.is_finite()));
        // one informative site with variance 1/2, divided by p = 3
        assert!((d[(0, 1)] - 2f64.sqrt() / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_sites() {
        let y = GenotypeMatrix::new(3, 0, vec![]).unwrap();
        assert_eq!(observed_genetic_distance(&y), DMatrix::zeros(3, 3));
    }

    #[test]
    fn test_standardize() {
        let z = standardize_genotypes(&example());
        for j in 0..3 {
            let col = z.column(j);
            assert!(col.mean().abs() < 1e-12);
            assert!((col.variance() - 1.0).abs() < 1e-12);
        }
        let y = GenotypeMatrix::from_rows(&[vec![1, 0], vec![1, 1]]).unwrap();
        let z = standardize_genotypes(&y);
        assert_eq!(z[(0, 0)], 0.0);
        assert_eq!(z[(1, 0)], 0.0);
    }
}
