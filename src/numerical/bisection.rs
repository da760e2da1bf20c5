//! Bisection (interval halving) root finding.
//!
//! Requires a bracket [a, b] with f(a)·f(b) < 0; by the Intermediate Value
//! Theorem the interval then contains a root. Each iteration halves the
//! interval and keeps the half whose endpoints still differ in sign.
//!
//! Convergence rule: |f(c)| < tol OR (b − a)/2 < tol. The OR is the
//! authoritative behavior here (some textbooks require both); either signal
//! alone terminates the loop.

use log::info;

use crate::expression::function_handle::FunctionHandle;
use crate::numerical::root_api::{
    IterationRecord, RootMethod, RootSolve, RootStatus, SolveFailure, checked_eval,
};

/// Run bisection on `f` over `[a, b]`.
///
/// Record columns: (Iter, a, b, c, f(c)). Exhausting `max_iter` is a soft
/// terminal state: the partial record and the last midpoint are returned.
pub fn bisection(
    f: &FunctionHandle,
    a: f64,
    b: f64,
    tol: f64,
    max_iter: usize,
) -> Result<RootSolve, SolveFailure> {
    let mut record = IterationRecord::new(RootMethod::Bisection);
    let mut a = a;
    let mut b = b;
    let mut fa = checked_eval(f, a, &record)?;
    let fb = checked_eval(f, b, &record)?;
    if fa * fb >= 0.0 {
        return Err(SolveFailure::InvalidBracket {
            a,
            b,
            product: fa * fb,
        });
    }

    let mut c = a;
    let mut fc = fa;
    for _ in 0..max_iter {
        // invariant: sign(f(a)) != sign(f(b)) at this point
        c = (a + b) / 2.0;
        fc = checked_eval(f, c, &record)?;
        record.push([a, b, c, fc]);
        info!("bisection: [{}, {}] -> c = {}, f(c) = {}", a, b, c, fc);

        if fc.abs() < tol || (b - a) / 2.0 < tol {
            return Ok(RootSolve {
                iterations: record.len(),
                record,
                status: RootStatus::Converged,
                root: c,
                residual: fc.abs(),
            });
        }

        if fc * fa < 0.0 {
            b = c;
        } else {
            a = c;
            fa = fc;
        }
    }

    Ok(RootSolve {
        iterations: record.len(),
        record,
        status: RootStatus::MaxIterationsReached,
        root: c,
        residual: fc.abs(),
    })
}
