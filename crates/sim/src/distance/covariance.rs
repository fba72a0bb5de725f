//! Covariance-based distances from the pseudo-inverse of a Laplacian.

use crate::errors::HabitatError;
use log::{debug, warn};
use nalgebra::{DMatrix, SymmetricEigen};

/// Relative tolerance for the symmetry check on pseudo-inverse input.
const SYMMETRY_TOLERANCE: f64 = 1e-10;

fn require_square(m: &DMatrix<f64>, what: &str) -> Result<(), HabitatError> {
    if !m.is_square() {
        return Err(HabitatError::Shape(format!(
            "{what} must be square, got {}x{}",
            m.nrows(),
            m.ncols()
        )));
    }
    Ok(())
}

fn require_finite(m: &DMatrix<f64>, what: &str) -> Result<(), HabitatError> {
    if m.iter().any(|v| !v.is_finite()) {
        return Err(HabitatError::Numerical(format!(
            "{what} contains non-finite entries"
        )));
    }
    Ok(())
}

fn max_abs(m: &DMatrix<f64>) -> f64 {
    m.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

/// `(A + Aᵀ) / 2`.
pub fn symmetric_part(a: &DMatrix<f64>) -> Result<DMatrix<f64>, HabitatError> {
    require_square(a, "matrix")?;
    Ok((a + a.transpose()) * 0.5)
}

/// Moore-Penrose pseudo-inverse of a symmetric matrix.
///
/// Uses the symmetric eigendecomposition `Q = V Λ Vᵀ` and inverts only the
/// eigenvalues with `|λ| > max|λ| · n · ε`. Input that is not symmetric to
/// within a relative `1e-10` is rejected.
pub fn pseudo_inverse_symmetric(q: &DMatrix<f64>) -> Result<DMatrix<f64>, HabitatError> {
    require_square(q, "matrix")?;
    require_finite(q, "matrix")?;
    let n = q.nrows();
    if n == 0 {
        return Ok(DMatrix::zeros(0, 0));
    }

    let asymmetry = max_abs(&(q - q.transpose()));
    if asymmetry > SYMMETRY_TOLERANCE * max_abs(q).max(1.0) {
        return Err(HabitatError::Numerical(format!(
            "matrix is not symmetric (max |Q - Qᵀ| = {asymmetry:.3e})"
        )));
    }

    let sym = (q + q.transpose()) * 0.5;
    let max_iter = (100 * n).max(1000);
    let eigen = SymmetricEigen::try_new(sym, f64::EPSILON, max_iter).ok_or_else(|| {
        HabitatError::Numerical(format!(
            "symmetric eigendecomposition did not converge in {max_iter} iterations"
        ))
    })?;

    let largest = eigen
        .eigenvalues
        .iter()
        .fold(0.0, |acc: f64, v| acc.max(v.abs()));
    let cutoff = largest * n as f64 * f64::EPSILON;
    let inverted = eigen
        .eigenvalues
        .map(|l| if l.abs() > cutoff { 1.0 / l } else { 0.0 });
    let rank = inverted.iter().filter(|v| **v != 0.0).count();
    debug!("pseudo-inverse of {n}x{n} matrix has rank {rank}");

    let v = &eigen.eigenvectors;
    Ok(v * DMatrix::from_diagonal(&inverted) * v.transpose())
}

/// `d_ij = Σ_ii + Σ_jj − Σ_ij − Σ_ji`, clamped at zero, with an exact zero
/// diagonal.
pub fn covariance_to_distance(sigma: &DMatrix<f64>) -> Result<DMatrix<f64>, HabitatError> {
    require_square(sigma, "covariance matrix")?;
    let n = sigma.nrows();
    Ok(DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            0.0
        } else {
            (sigma[(i, i)] + sigma[(j, j)] - sigma[(i, j)] - sigma[(j, i)]).max(0.0)
        }
    }))
}

/// Resistance distance from a symmetric Laplacian.
pub fn resistance_distance(laplacian: &DMatrix<f64>) -> Result<DMatrix<f64>, HabitatError> {
    let sigma = pseudo_inverse_symmetric(laplacian)?;
    covariance_to_distance(&sigma)
}

/// Random-walk distance: the resistance transform applied to `L Lᵀ`.
///
/// `L Lᵀ` is symmetric for any `L`, so asymmetric Laplacians are accepted.
pub fn random_walk_distance(laplacian: &DMatrix<f64>) -> Result<DMatrix<f64>, HabitatError> {
    require_square(laplacian, "Laplacian")?;
    require_finite(laplacian, "Laplacian")?;
    let product = laplacian * laplacian.transpose();
    if max_abs(&product) == 0.0 {
        warn!("Laplacian is zero; random-walk distance is identically zero");
    }
    let sigma = pseudo_inverse_symmetric(&product)?;
    covariance_to_distance(&sigma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habitat::{build_circle, build_line, build_triangular_lattice, UniformMigration};

    fn laplacian_of(hab: crate::Habitat, rate: f64) -> DMatrix<f64> {
        hab.with_surface(&UniformMigration::new(rate))
            .unwrap()
            .laplacian()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_pinv_of_invertible_matches_inverse() {
        let q = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let p = pseudo_inverse_symmetric(&q).unwrap();
        let id = &q * &p;
        assert!((id - DMatrix::identity(2, 2)).norm() < 1e-12);
    }

    #[test]
    fn test_pinv_penrose_conditions() {
        let l = laplacian_of(build_line(5).unwrap(), 0.3);
        let p = pseudo_inverse_symmetric(&l).unwrap();
        assert!((&l * &p * &l - &l).norm() < 1e-10);
        assert!((&p * &l * &p - &p).norm() < 1e-8);
    }

    #[test]
    fn test_pinv_rejects_asymmetric() {
        let q = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.0, 1.0]);
        assert!(matches!(
            pseudo_inverse_symmetric(&q),
            Err(HabitatError::Numerical(_))
        ));
    }

    #[test]
    fn test_pinv_rejects_non_square_and_nan() {
        assert!(matches!(
            pseudo_inverse_symmetric(&DMatrix::zeros(2, 3)),
            Err(HabitatError::Shape(_))
        ));
        let q = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, f64::NAN, 1.0]);
        assert!(matches!(
            pseudo_inverse_symmetric(&q),
            Err(HabitatError::Numerical(_))
        ));
    }

    #[test]
    fn test_resistance_on_line() {
        let m = 0.25;
        let r = resistance_distance(&laplacian_of(build_line(6).unwrap(), m)).unwrap();
        for i in 0..6 {
            for j in 0..6 {
                let expected = (i as f64 - j as f64).abs() / m;
                assert!((r[(i, j)] - expected).abs() < 1e-9, "({i}, {j}) = {}", r[(i, j)]);
            }
        }
    }

    #[test]
    fn test_resistance_on_ring_is_rotation_invariant() {
        let r = resistance_distance(&laplacian_of(build_circle(4).unwrap(), 0.1)).unwrap();
        for i in 0..4 {
            assert!((r[(i, (i + 1) % 4)] - 7.5).abs() < 1e-9);
            assert!((r[(i, (i + 2) % 4)] - 10.0).abs() < 1e-9);
            assert!((r[(i, (i + 3) % 4)] - 7.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resistance_is_a_metric() {
        let r = resistance_distance(&laplacian_of(build_triangular_lattice(3, 4).unwrap(), 0.2))
            .unwrap();
        let d = r.nrows();
        for i in 0..d {
            assert_eq!(r[(i, i)], 0.0);
            for j in 0..d {
                assert!((r[(i, j)] - r[(j, i)]).abs() < 1e-9);
                if i != j {
                    assert!(r[(i, j)] > 0.0);
                }
                for k in 0..d {
                    assert!(r[(i, j)] <= r[(i, k)] + r[(k, j)] + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_zero_laplacian_gives_zero_distances() {
        let l = DMatrix::zeros(3, 3);
        assert_eq!(resistance_distance(&l).unwrap(), DMatrix::<f64>::zeros(3, 3));
        assert_eq!(random_walk_distance(&l).unwrap(), DMatrix::<f64>::zeros(3, 3));
    }

    #[test]
    fn test_single_deme() {
        let l = DMatrix::zeros(1, 1);
        assert_eq!(resistance_distance(&l).unwrap(), DMatrix::<f64>::zeros(1, 1));
    }

    #[test]
    fn test_random_walk_distance_on_line() {
        let rw = random_walk_distance(&laplacian_of(build_line(4).unwrap(), 1.0)).unwrap();
        assert_eq!(rw[(0, 0)], 0.0);
        assert!((rw[(0, 1)] - rw[(1, 0)]).abs() < 1e-9);
        // monotone along the path from an end deme
        assert!(rw[(0, 1)] < rw[(0, 2)]);
        assert!(rw[(0, 2)] < rw[(0, 3)]);
    }

    #[test]
    fn test_random_walk_accepts_asymmetric() {
        let l = DMatrix::from_row_slice(2, 2, &[0.5, -0.5, 0.0, 0.0]);
        let rw = random_walk_distance(&l).unwrap();
        assert!(rw[(0, 1)] > 0.0);
    }

    #[test]
    fn test_covariance_to_distance_clamps() {
        let s = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        let d = covariance_to_distance(&s).unwrap();
        assert_eq!(d, DMatrix::zeros(2, 2));
    }

    #[test]
    fn test_symmetric_part() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 0.0, 1.0]);
        let s = symmetric_part(&a).unwrap();
        assert_eq!(s, DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]));
    }
}
