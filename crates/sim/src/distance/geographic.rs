//! Distances between deme positions.

use nalgebra::DMatrix;

/// Pairwise standardized Euclidean distance between the rows of `points`.
///
/// Each squared coordinate difference is divided by the sample variance
/// (ddof = 1) of that coordinate. Coordinates with zero variance, and all
/// coordinates when there are fewer than two rows, contribute nothing.
pub fn standardized_euclidean(points: &DMatrix<f64>) -> DMatrix<f64> {
    let n = points.nrows();
    let weights: Vec<(usize, f64)> = if n < 2 {
        Vec::new()
    } else {
        points
            .column_iter()
            .enumerate()
            .filter_map(|(k, col)| {
                let var = col.variance() * n as f64 / (n - 1) as f64;
                (var > 0.0).then(|| (k, 1.0 / var))
            })
            .collect()
    };

    let mut out = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let sq: f64 = weights
                .iter()
                .map(|&(k, w)| {
                    let diff = points[(i, k)] - points[(j, k)];
                    diff * diff * w
                })
                .sum();
            let d = sq.sqrt();
            out[(i, j)] = d;
            out[(j, i)] = d;
        }
    }
    out
}

/// Geographic distance between demes: half the standardized Euclidean
/// distance between their positions.
pub fn geographic_distance(positions: &DMatrix<f64>) -> DMatrix<f64> {
    standardized_euclidean(positions) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ignores_constant_axis() {
        let pos = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
        let g = geographic_distance(&pos);
        // var(x) = 1 with ddof = 1
        assert!((g[(0, 1)] - 0.5).abs() < 1e-12);
        assert!((g[(0, 2)] - 1.0).abs() < 1e-12);
        assert!(g.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_standardization_scales_axes() {
        let pos = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 2.0, 10.0]);
        let s = standardized_euclidean(&pos);
        // both axes have two points, each difference is sqrt(2) standard deviations
        assert!((s[(0, 1)] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_point() {
        let pos = DMatrix::from_row_slice(1, 2, &[3.0, 4.0]);
        assert_eq!(geographic_distance(&pos), DMatrix::zeros(1, 1));
    }

    #[test]
    fn test_symmetric_zero_diagonal() {
        let pos = DMatrix::from_row_slice(4, 2, &[0.0, 1.0, 2.0, 0.5, 1.0, 3.0, 4.0, 2.0]);
        let g = geographic_distance(&pos);
        for i in 0..4 {
            assert_eq!(g[(i, i)], 0.0);
            for j in 0..4 {
                assert_eq!(g[(i, j)], g[(j, i)]);
            }
        }
    }
}
