//! Dense square linear systems Ax = b: solve, determinant, condition
//! number.
//!
//! The solve itself is delegated to nalgebra's LU decomposition — nothing
//! is reimplemented here. What this module adds are the diagnostics the
//! teaching UI shows next to the solution: the determinant (singularity
//! check) and the condition number sigma_max/sigma_min (sensitivity of the
//! solution to small changes in the input data). A poorly conditioned
//! system still solves, but gets a warning in the log.

use log::warn;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// |det| below this counts as singular.
pub const SINGULARITY_EPS: f64 = 1e-12;

/// Condition numbers above this trigger the ill-conditioning warning.
pub const CONDITION_WARN_THRESHOLD: f64 = 1e5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinAlgError {
    #[error("the coefficient matrix must be square, got {rows}x{cols}. One equation per unknown")]
    NotSquare { rows: usize, cols: usize },
    #[error(
        "the right-hand side has {b_len} entries but the matrix has {rows} rows. One constant per equation"
    )]
    ShapeMismatch { rows: usize, b_len: usize },
    #[error(
        "singular matrix (determinant = {determinant}): the system has no unique solution. Check the equations for a linearly dependent row"
    )]
    SingularMatrix { determinant: f64 },
}

/// Solution plus the diagnostics shown alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystemReport {
    pub solution: DVector<f64>,
    pub determinant: f64,
    pub condition_number: f64,
}

/// Condition number sigma_max / sigma_min from the singular values.
pub fn condition_number(a: &DMatrix<f64>) -> f64 {
    let singular_values = a.singular_values();
    let max_sigma = singular_values.iter().cloned().fold(f64::MIN, f64::max);
    let min_sigma = singular_values.iter().cloned().fold(f64::MAX, f64::min);
    max_sigma / min_sigma
}

/// Whether the matrix is too ill-conditioned to trust the solution.
pub fn poorly_conditioned(a: &DMatrix<f64>, threshold: f64) -> bool {
    let cond = condition_number(a);
    let poorly = cond > threshold;
    if poorly {
        warn!(
            "The system of linear equations is poorly conditioned. Condition number = {:.2}",
            cond
        );
    }
    poorly
}

/// Solve the square dense system Ax = b with LU, returning the solution
/// together with determinant and condition number.
pub fn solve_dense(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
) -> Result<LinearSystemReport, LinAlgError> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(LinAlgError::NotSquare { rows, cols });
    }
    if b.len() != rows {
        return Err(LinAlgError::ShapeMismatch {
            rows,
            b_len: b.len(),
        });
    }

    let determinant = a.determinant();
    if determinant.abs() < SINGULARITY_EPS {
        warn!("Matrix is singular. Determinant = {:.8}", determinant);
        return Err(LinAlgError::SingularMatrix { determinant });
    }
    let cond = condition_number(a);
    poorly_conditioned(a, CONDITION_WARN_THRESHOLD);

    let lu = a.clone().lu();
    let solution = match lu.solve(b) {
        Some(x) => x,
        None => return Err(LinAlgError::SingularMatrix { determinant }),
    };

    Ok(LinearSystemReport {
        solution,
        determinant,
        condition_number: cond,
    })
}

/// Famous example of an ill-conditioned matrix.
pub fn hilbert_matrix(n: usize) -> DMatrix<f64> {
    let mut a = DMatrix::zeros(n, n);
    for i in 1..n + 1 {
        for j in 1..n + 1 {
            a[(i - 1, j - 1)] = 1.0 / (i as f64 + j as f64 - 1.0);
        }
    }
    a
}
