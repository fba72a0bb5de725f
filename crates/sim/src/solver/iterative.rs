use super::{CsrMatrix, SolveOutcome, SolverMethod, SolverOptions};
use crate::errors::SolverError;
use log::debug;
use nalgebra::DVector;

/// Solve `A x = b` with the configured method.
pub fn solve(
    a: &CsrMatrix,
    b: &DVector<f64>,
    options: &SolverOptions,
) -> Result<SolveOutcome, SolverError> {
    check_dimensions(a, b)?;
    let outcome = match options.method {
        SolverMethod::ConjugateGradient => {
            if !a.is_symmetric(SYMMETRY_TOLERANCE * max_abs(a).max(1.0)) {
                return Err(SolverError::NotSymmetric);
            }
            conjugate_gradient(a, b, options)?
        }
        SolverMethod::BiCgStab => bicgstab(a, b, options)?,
        SolverMethod::Direct => direct(a, b)?,
    };
    debug!(
        "{} solved {} unknowns in {} iterations (relative residual {:.3e})",
        options.method,
        a.nrows(),
        outcome.iterations,
        outcome.residual
    );
    Ok(outcome)
}

/// Relative tolerance for the symmetry check before conjugate gradient.
const SYMMETRY_TOLERANCE: f64 = 1e-12;

fn max_abs(a: &CsrMatrix) -> f64 {
    (0..a.nrows())
        .flat_map(|i| a.row(i))
        .fold(0.0_f64, |m, (_, v)| m.max(v.abs()))
}

fn check_dimensions(a: &CsrMatrix, b: &DVector<f64>) -> Result<(), SolverError> {
    if a.nrows() != a.ncols() || a.nrows() != b.len() {
        return Err(SolverError::DimensionMismatch {
            rows: a.nrows(),
            len: b.len(),
        });
    }
    Ok(())
}

/// Trivial outcome for a zero right-hand side.
fn zero_outcome(n: usize) -> SolveOutcome {
    SolveOutcome {
        solution: DVector::zeros(n),
        iterations: 0,
        residual: 0.0,
    }
}

/// Conjugate gradient for symmetric positive-definite systems.
pub fn conjugate_gradient(
    a: &CsrMatrix,
    b: &DVector<f64>,
    options: &SolverOptions,
) -> Result<SolveOutcome, SolverError> {
    check_dimensions(a, b)?;
    let n = b.len();
    let b_norm = b.norm();
    if b_norm == 0.0 {
        return Ok(zero_outcome(n));
    }

    let max_iter = options.iteration_cap(n);
    let mut x = DVector::zeros(n);
    let mut r = b.clone();
    let mut p = r.clone();
    let mut ap = DVector::zeros(n);
    let mut rs = r.dot(&r);

    for k in 0..max_iter {
        let residual = rs.sqrt() / b_norm;
        if residual <= options.tolerance {
            return Ok(SolveOutcome {
                solution: x,
                iterations: k,
                residual,
            });
        }

        a.mul_vec_into(&p, &mut ap);
        let pap = p.dot(&ap);
        if !pap.is_finite() || pap <= 0.0 {
            return Err(SolverError::Breakdown {
                iteration: k,
                reason: "matrix is not positive definite along search direction",
            });
        }

        let alpha = rs / pap;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);
        let rs_new = r.dot(&r);
        p.axpy(1.0, &r, rs_new / rs);
        rs = rs_new;
    }

    let residual = rs.sqrt() / b_norm;
    if residual <= options.tolerance {
        Ok(SolveOutcome {
            solution: x,
            iterations: max_iter,
            residual,
        })
    } else {
        Err(SolverError::NotConverged {
            iterations: max_iter,
            residual,
        })
    }
}

/// Stabilized bi-conjugate gradient (van der Vorst, 1992).
pub fn bicgstab(
    a: &CsrMatrix,
    b: &DVector<f64>,
    options: &SolverOptions,
) -> Result<SolveOutcome, SolverError> {
    check_dimensions(a, b)?;
    let n = b.len();
    let b_norm = b.norm();
    if b_norm == 0.0 {
        return Ok(zero_outcome(n));
    }

    let max_iter = options.iteration_cap(n);
    let mut x = DVector::zeros(n);
    let mut r = b.clone();
    let r_hat = r.clone();
    let mut p = DVector::zeros(n);
    let mut v = DVector::zeros(n);
    let mut t = DVector::zeros(n);
    let (mut rho, mut alpha, mut omega) = (1.0, 1.0, 1.0);
    let mut residual = 1.0;

    for k in 1..=max_iter {
        let rho_new = r_hat.dot(&r);
        if rho_new.abs() < f64::MIN_POSITIVE || !rho_new.is_finite() {
            return Err(SolverError::Breakdown {
                iteration: k,
                reason: "rho vanished",
            });
        }

        if k == 1 {
            p.copy_from(&r);
        } else {
            let beta = (rho_new / rho) * (alpha / omega);
            // p = r + beta * (p - omega * v)
            p.axpy(-omega, &v, 1.0);
            p.axpy(1.0, &r, beta);
        }

        a.mul_vec_into(&p, &mut v);
        let denom = r_hat.dot(&v);
        if denom.abs() < f64::MIN_POSITIVE || !denom.is_finite() {
            return Err(SolverError::Breakdown {
                iteration: k,
                reason: "search direction orthogonal to shadow residual",
            });
        }
        alpha = rho_new / denom;

        // s is stored in r
        r.axpy(-alpha, &v, 1.0);
        let s_norm = r.norm() / b_norm;
        if s_norm <= options.tolerance {
            x.axpy(alpha, &p, 1.0);
            return Ok(SolveOutcome {
                solution: x,
                iterations: k,
                residual: s_norm,
            });
        }

        a.mul_vec_into(&r, &mut t);
        let tt = t.dot(&t);
        if tt < f64::MIN_POSITIVE {
            return Err(SolverError::Breakdown {
                iteration: k,
                reason: "stabilization step vanished",
            });
        }
        omega = t.dot(&r) / tt;

        x.axpy(alpha, &p, 1.0);
        x.axpy(omega, &r, 1.0);
        r.axpy(-omega, &t, 1.0);

        residual = r.norm() / b_norm;
        if residual <= options.tolerance {
            return Ok(SolveOutcome {
                solution: x,
                iterations: k,
                residual,
            });
        }
        if omega == 0.0 || !omega.is_finite() {
            return Err(SolverError::Breakdown {
                iteration: k,
                reason: "omega vanished",
            });
        }
        rho = rho_new;
    }

    Err(SolverError::NotConverged {
        iterations: max_iter,
        residual,
    })
}

/// Dense LU solve.
pub fn direct(a: &CsrMatrix, b: &DVector<f64>) -> Result<SolveOutcome, SolverError> {
    check_dimensions(a, b)?;
    let n = b.len();
    if n == 0 {
        return Ok(zero_outcome(0));
    }
    let dense = a.to_dense();
    let solution = dense.lu().solve(b).ok_or(SolverError::Singular)?;
    if solution.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::Singular);
    }
    let b_norm = b.norm();
    let residual = if b_norm == 0.0 {
        0.0
    } else {
        (b - a.mul_vec(&solution)).norm() / b_norm
    };
    Ok(SolveOutcome {
        solution,
        iterations: 1,
        residual,
    })
}
