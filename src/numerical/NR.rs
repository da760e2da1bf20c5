//! Newton-Raphson root finding with a numeric derivative.
//!
//! The derivative is the central difference (f(x+h) − f(x−h)) / (2h) with a
//! fixed h — there is no symbolic differentiation in this crate. h = 1e-5
//! trades truncation error against catastrophic cancellation; much smaller
//! values start losing digits in the subtraction.
//!
//! Convergence is local and not guaranteed: no bracket is required, and a
//! bad starting point can walk the iterate out of the function domain (that
//! aborts with an evaluation failure carrying the partial record) or onto a
//! flat spot (derivative-vanished failure).

use log::info;

use crate::expression::function_handle::FunctionHandle;
use crate::numerical::root_api::{
    IterationRecord, RootMethod, RootSolve, RootStatus, SolveFailure, checked_eval,
};

/// Step of the central-difference derivative.
pub const CENTRAL_DIFF_STEP: f64 = 1e-5;

/// Below this magnitude the derivative counts as vanished.
pub const DERIVATIVE_FLOOR: f64 = 1e-12;

/// Central-difference approximation of f'(x).
pub fn central_difference(
    f: &FunctionHandle,
    x: f64,
    record: &IterationRecord,
) -> Result<f64, SolveFailure> {
    let h = CENTRAL_DIFF_STEP;
    let forward = checked_eval(f, x + h, record)?;
    let backward = checked_eval(f, x - h, record)?;
    Ok((forward - backward) / (2.0 * h))
}

/// Run Newton-Raphson from `x0`.
///
/// Record columns: (Iter, x_old, f(x), x_new, Delta); the step size
/// |x_new − x_old| is the convergence measure.
pub fn newton_raphson(
    f: &FunctionHandle,
    x0: f64,
    tol: f64,
    max_iter: usize,
) -> Result<RootSolve, SolveFailure> {
    let mut record = IterationRecord::new(RootMethod::NewtonRaphson);
    let mut x = x0;
    for _ in 0..max_iter {
        let fx = checked_eval(f, x, &record)?;
        let dfx = central_difference(f, x, &record)?;
        if dfx.abs() < DERIVATIVE_FLOOR {
            return Err(SolveFailure::DerivativeVanished { x, derivative: dfx });
        }

        let x_new = x - fx / dfx;
        let delta = (x_new - x).abs();
        record.push([x, fx, x_new, delta]);
        info!("newton: x = {} -> {} (delta = {})", x, x_new, delta);

        if delta < tol {
            let residual = checked_eval(f, x_new, &record)?.abs();
            return Ok(RootSolve {
                iterations: record.len(),
                record,
                status: RootStatus::Converged,
                root: x_new,
                residual,
            });
        }
        x = x_new;
    }

    let residual = checked_eval(f, x, &record)?.abs();
    Ok(RootSolve {
        iterations: record.len(),
        record,
        status: RootStatus::MaxIterationsReached,
        root: x,
        residual,
    })
}
