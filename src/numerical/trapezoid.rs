//! Composite trapezoidal integration over a uniform partition.
//!
//! The integral of f over [a, b] is approximated by n trapezoids of equal
//! width dx = (b − a)/n:
//!
//! ```text
//! estimate = dx/2 * (y0 + 2*(y1 + ... + y_{n-1}) + yn)
//! ```
//!
//! The summation keeps exactly this grouping so reruns are reproducible
//! bit for bit. Global error is O(h^2): doubling n quarters the error for
//! smooth integrands (checked by a test, not enforced at runtime).

use itertools::Itertools;
use nalgebra::DVector;
use thiserror::Error;

use crate::expression::function_handle::FunctionHandle;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrateError {
    #[error(
        "invalid interval: a = {a} must be strictly less than b = {b}. Swap the bounds or widen the interval"
    )]
    InvalidInterval { a: f64, b: f64 },
    #[error("segment count must be at least 1, got {n}. Use n >= 4 for usable accuracy")]
    TooFewSegments { n: usize },
    #[error("f({x}) is not a finite number; the integrand cannot be sampled there. Adjust the bounds")]
    Evaluation { x: f64 },
}

/// Result of one integration: the scalar estimate plus the partition
/// samples used to build it (and to draw the trapezoids).
#[derive(Debug, Clone, PartialEq)]
pub struct Quadrature {
    pub estimate: f64,
    pub dx: f64,
    /// n+1 partition points, endpoints included exactly.
    pub x: DVector<f64>,
    /// f sampled at the partition points.
    pub y: DVector<f64>,
}

impl Quadrature {
    pub fn segments(&self) -> usize {
        self.x.len() - 1
    }

    /// Corner points of each trapezoid, in drawing order
    /// (x_i, 0), (x_i, y_i), (x_{i+1}, y_{i+1}), (x_{i+1}, 0).
    pub fn trapezoid_corners(&self) -> Vec<[(f64, f64); 4]> {
        self.x
            .iter()
            .zip(self.y.iter())
            .tuple_windows()
            .map(|((&x0, &y0), (&x1, &y1))| [(x0, 0.0), (x0, y0), (x1, y1), (x1, 0.0)])
            .collect()
    }
}

/// Integrate `f` over `[a, b]` with `n` equal segments.
pub fn integrate(
    f: &FunctionHandle,
    a: f64,
    b: f64,
    n: usize,
) -> Result<Quadrature, IntegrateError> {
    if !(a < b) {
        return Err(IntegrateError::InvalidInterval { a, b });
    }
    if n < 1 {
        return Err(IntegrateError::TooFewSegments { n });
    }

    let dx = (b - a) / n as f64;
    // pin both endpoints exactly, like np.linspace
    let x = DVector::from_fn(n + 1, |i, _| if i == n { b } else { a + i as f64 * dx });
    let y = x.map(|xi| f.eval(xi));
    for (xi, yi) in x.iter().zip(y.iter()) {
        if !yi.is_finite() {
            return Err(IntegrateError::Evaluation { x: *xi });
        }
    }

    let mut interior = 0.0;
    for i in 1..n {
        interior += y[i];
    }
    let estimate = 0.5 * dx * (y[0] + 2.0 * interior + y[n]);

    Ok(Quadrature { estimate, dx, x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_sin_plus_one_over_zero_pi() {
        // closed form: [-cos x + x] from 0 to pi = 2 + pi
        let f = FunctionHandle::parse("sin(x) + 1").unwrap();
        let exact = 2.0 + PI;
        // n = 10 carries a discretization error just under 2e-2
        let q = integrate(&f, 0.0, PI, 10).unwrap();
        assert!((q.estimate - exact).abs() < 2e-2);
        // and the estimate converges toward the closed form as n grows
        let q64 = integrate(&f, 0.0, PI, 64).unwrap();
        assert!((q64.estimate - exact).abs() < 1e-3);
    }

    #[test]
    fn test_doubling_n_quarters_the_error() {
        let f = FunctionHandle::parse("sin(x) + 1").unwrap();
        let exact = 2.0 + PI;
        let coarse = (integrate(&f, 0.0, PI, 10).unwrap().estimate - exact).abs();
        let fine = (integrate(&f, 0.0, PI, 20).unwrap().estimate - exact).abs();
        let ratio = coarse / fine;
        assert!(
            (3.5..4.5).contains(&ratio),
            "O(h^2): expected ratio near 4, got {}",
            ratio
        );
    }

    #[test]
    fn test_exact_on_linear_integrand() {
        // trapezoids are exact for straight lines
        let f = FunctionHandle::parse("2 * x + 1").unwrap();
        let q = integrate(&f, 0.0, 4.0, 4).unwrap();
        assert_relative_eq!(q.estimate, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_arrays_cover_partition() {
        let f = FunctionHandle::parse("x**2").unwrap();
        let q = integrate(&f, 1.0, 3.0, 8).unwrap();
        assert_eq!(q.x.len(), 9);
        assert_eq!(q.y.len(), 9);
        assert_eq!(q.x[0], 1.0);
        assert_eq!(q.x[8], 3.0);
        assert_eq!(q.segments(), 8);
        assert_relative_eq!(q.dx, 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_trapezoid_corners_match_samples() {
        let f = FunctionHandle::parse("x + 1").unwrap();
        let q = integrate(&f, 0.0, 2.0, 2).unwrap();
        let corners = q.trapezoid_corners();
        assert_eq!(corners.len(), 2);
        assert_eq!(corners[0], [(0.0, 0.0), (0.0, 1.0), (1.0, 2.0), (1.0, 0.0)]);
        assert_eq!(corners[1], [(1.0, 0.0), (1.0, 2.0), (2.0, 3.0), (2.0, 0.0)]);
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        let f = FunctionHandle::parse("x").unwrap();
        assert!(matches!(
            integrate(&f, 1.0, 0.0, 10),
            Err(IntegrateError::InvalidInterval { .. })
        ));
        assert!(matches!(
            integrate(&f, 1.0, 1.0, 10),
            Err(IntegrateError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_zero_segments_rejected() {
        let f = FunctionHandle::parse("x").unwrap();
        assert!(matches!(
            integrate(&f, 0.0, 1.0, 0),
            Err(IntegrateError::TooFewSegments { n: 0 })
        ));
    }

    #[test]
    fn test_nonfinite_sample_rejected() {
        // 1/x blows up at the lower bound
        let f = FunctionHandle::parse("1 / x").unwrap();
        assert!(matches!(
            integrate(&f, 0.0, 1.0, 10),
            Err(IntegrateError::Evaluation { x }) if x == 0.0
        ));
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let f = FunctionHandle::parse("exp(x) * sin(x)").unwrap();
        let first = integrate(&f, 0.0, 2.0, 64).unwrap();
        let second = integrate(&f, 0.0, 2.0, 64).unwrap();
        assert_eq!(first, second);
    }
}
