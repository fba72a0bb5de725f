//! Expected coalescence times under the stepping-stone model.

use crate::errors::HabitatError;
use crate::solver::{self, CsrMatrix, SolverOptions};
use log::info;
use nalgebra::{DMatrix, DVector};

/// Dense numbering of unordered deme pairs `(α, β)`, `α ≤ β`, in
/// upper-triangular row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIndex {
    demes: usize,
}

impl PairIndex {
    pub fn new(demes: usize) -> Self {
        Self { demes }
    }

    /// Number of unordered pairs, `d(d+1)/2`.
    pub fn len(&self) -> usize {
        self.demes * (self.demes + 1) / 2
    }

    pub fn is_empty(&self) -> bool {
        self.demes == 0
    }

    /// Index of the pair `{a, b}`; symmetric in its arguments.
    pub fn index(&self, a: usize, b: usize) -> usize {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        lo * self.demes - lo * lo.saturating_sub(1) / 2 + (hi - lo)
    }

    /// Pairs in index order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.demes).flat_map(move |a| (a..self.demes).map(move |b| (a, b)))
    }
}

/// Assemble the linear system `A t = 1` whose solution holds the expected
/// coalescence time of every unordered pair of demes.
///
/// Row `(α, β)` carries `1` on `(α, α)` when `α == β`, `L[α][γ]` on
/// `(β, γ)` and `L[β][γ]` on `(α, γ)` for every `γ`.
pub fn coalescent_system(
    laplacian: &DMatrix<f64>,
) -> Result<(CsrMatrix, DVector<f64>), HabitatError> {
    if !laplacian.is_square() {
        return Err(HabitatError::Shape(format!(
            "Laplacian must be square, got {}x{}",
            laplacian.nrows(),
            laplacian.ncols()
        )));
    }
    if laplacian.iter().any(|v| !v.is_finite()) {
        return Err(HabitatError::Numerical(
            "Laplacian contains non-finite entries".to_string(),
        ));
    }

    let d = laplacian.nrows();
    let h = PairIndex::new(d);
    let rows = h
        .pairs()
        .map(|(a, b)| {
            let mut row = Vec::with_capacity(2 * d + 1);
            if a == b {
                row.push((h.index(a, a), 1.0));
            }
            for g in 0..d {
                row.push((h.index(b, g), laplacian[(a, g)]));
                row.push((h.index(a, g), laplacian[(b, g)]));
            }
            row
        })
        .collect();

    Ok((CsrMatrix::from_rows(h.len(), rows), DVector::from_element(h.len(), 1.0)))
}

/// Expected pairwise coalescence times between demes.
///
/// The result is symmetric with the within-deme time on the diagonal. A
/// disconnected habitat makes the system singular; solvers then fail to
/// converge and a [`HabitatError::Numerical`] is returned.
pub fn coalescent_expected_distance(
    laplacian: &DMatrix<f64>,
    options: &SolverOptions,
) -> Result<DMatrix<f64>, HabitatError> {
    let (a, b) = coalescent_system(laplacian)?;
    let d = laplacian.nrows();
    info!(
        "Solving coalescence-time system: {} pairs, {} non-zeros, method {}",
        a.nrows(),
        a.nnz(),
        options.method
    );
    let outcome = solver::solve(&a, &b, options)?;
    if outcome.solution.iter().any(|v| !v.is_finite()) {
        return Err(HabitatError::Numerical(
            "coalescence-time solution contains non-finite values".to_string(),
        ));
    }

    let h = PairIndex::new(d);
    Ok(DMatrix::from_fn(d, d, |i, j| outcome.solution[h.index(i, j)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habitat::{
        build_line, build_triangular_lattice, laplacian_from_migration, UniformMigration,
    };
    use crate::solver::SolverMethod;

    fn two_demes(m: f64) -> DMatrix<f64> {
        laplacian_from_migration(&DMatrix::from_row_slice(2, 2, &[0.0, m, m, 0.0])).unwrap()
    }

    #[test]
    fn test_pair_index_order() {
        let h = PairIndex::new(3);
        assert_eq!(h.len(), 6);
        let pairs: Vec<_> = h.pairs().collect();
        assert_eq!(pairs, vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]);
        for (k, (a, b)) in pairs.into_iter().enumerate() {
            assert_eq!(h.index(a, b), k);
            assert_eq!(h.index(b, a), k);
        }
    }

    #[test]
    fn test_system_for_two_demes() {
        let m = 0.1;
        let (a, b) = coalescent_system(&two_demes(m)).unwrap();
        assert_eq!(a.nrows(), 3);
        assert_eq!(b, DVector::from_element(3, 1.0));
        assert!((a.get(0, 0) - (1.0 + 2.0 * m)).abs() < 1e-15);
        assert!((a.get(0, 1) + 2.0 * m).abs() < 1e-15);
        assert_eq!(a.get(0, 2), 0.0);
        assert!((a.get(1, 0) + m).abs() < 1e-15);
        assert!((a.get(1, 1) - 2.0 * m).abs() < 1e-15);
        assert!((a.get(1, 2) + m).abs() < 1e-15);
    }

    #[test]
    fn test_two_deme_times() {
        for m in [0.1, 0.5, 2.0] {
            let t = coalescent_expected_distance(&two_demes(m), &SolverOptions::default()).unwrap();
            assert!((t[(0, 0)] - 2.0).abs() < 1e-6);
            assert!((t[(1, 1)] - 2.0).abs() < 1e-6);
            let between = 2.0 + 1.0 / (2.0 * m);
            assert!((t[(0, 1)] - between).abs() < 1e-6, "m = {m}: {}", t[(0, 1)]);
            assert_eq!(t[(0, 1)], t[(1, 0)]);
        }
    }

    #[test]
    fn test_single_deme_time_is_one() {
        let t = coalescent_expected_distance(&DMatrix::zeros(1, 1), &SolverOptions::default())
            .unwrap();
        assert!((t[(0, 0)] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_iterative_matches_direct() {
        let l = build_triangular_lattice(3, 3)
            .unwrap()
            .with_surface(&UniformMigration::new(0.2))
            .unwrap()
            .laplacian()
            .unwrap()
            .clone();
        let iterative = coalescent_expected_distance(
            &l,
            &SolverOptions::new(SolverMethod::BiCgStab, 1e-11),
        )
        .unwrap();
        let direct =
            coalescent_expected_distance(&l, &SolverOptions::new(SolverMethod::Direct, 0.0))
                .unwrap();
        assert!((&iterative - &direct).amax() < 1e-6 * direct.amax());
    }

    #[test]
    fn test_times_grow_with_separation() {
        let l = build_line(5)
            .unwrap()
            .with_surface(&UniformMigration::new(0.5))
            .unwrap()
            .laplacian()
            .unwrap()
            .clone();
        let t = coalescent_expected_distance(&l, &SolverOptions::default()).unwrap();
        assert!(t[(0, 1)] < t[(0, 2)]);
        assert!(t[(0, 2)] < t[(0, 4)]);
        for i in 0..4 {
            assert!(t[(i, i)] < t[(i, i + 1)]);
        }
    }

    #[test]
    fn test_separate_absorbing_regions_fail_without_nan() {
        // the middle deme sends lineages to both ends, which never exchange
        let m = DMatrix::from_row_slice(3, 3, &[0.0, 0.0, 0.0, 0.4, 0.0, 0.4, 0.0, 0.0, 0.0]);
        let l = laplacian_from_migration(&m).unwrap();
        for method in [SolverMethod::BiCgStab, SolverMethod::Direct] {
            let err = coalescent_expected_distance(&l, &SolverOptions::new(method, 1e-10))
                .unwrap_err();
            assert!(matches!(err, HabitatError::Numerical(_)), "{method}: {err:?}");
        }
    }

    #[test]
    fn test_conjugate_gradient_rejected() {
        let err = coalescent_expected_distance(
            &two_demes(0.5),
            &SolverOptions::new(SolverMethod::ConjugateGradient, 1e-10),
        )
        .unwrap_err();
        assert!(matches!(err, HabitatError::Numerical(_)));
    }

    #[test]
    fn test_disconnected_habitat_fails() {
        let l = DMatrix::zeros(3, 3);
        let err = coalescent_expected_distance(&l, &SolverOptions::new(SolverMethod::Direct, 0.0))
            .unwrap_err();
        assert!(matches!(err, HabitatError::Numerical(_)));
    }
}
