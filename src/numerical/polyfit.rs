//! Polynomial fitting: exact interpolation and least-squares regression.
//!
//! Both go through the same least-squares machinery: build the Vandermonde
//! matrix of the sample abscissas and solve for the coefficients with an
//! SVD (rank-tolerant, handles the near-singular systems that clustered
//! sample points produce). Exact interpolation is the special case
//! degree = n − 1; straight-line regression is degree = 1.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error(
        "x and y must have the same length, got {x_len} and {y_len}. Check the sample lists for a missing value"
    )]
    ShapeMismatch { x_len: usize, y_len: usize },
    #[error("at least {needed} sample points are required, got {got}. Add more data")]
    TooFewPoints { needed: usize, got: usize },
    #[error(
        "a degree {degree} fit needs more than {points} sample points. Lower the degree or add points"
    )]
    DegreeTooHigh { degree: usize, points: usize },
    #[error("the fit system is singular; sample points may coincide. Use distinct x values")]
    Singular,
}

/// Dense polynomial c0 + c1*x + ... + cd*x^d.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: DVector<f64>,
}

impl Polynomial {
    pub fn new(coeffs: DVector<f64>) -> Polynomial {
        assert!(!coeffs.is_empty(), "a polynomial needs at least one coefficient");
        Polynomial { coeffs }
    }

    /// Coefficients in ascending order of power.
    pub fn coefficients(&self) -> &DVector<f64> {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Horner evaluation from the highest power down.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.coeffs.len();
        let mut result = self.coeffs[n - 1];
        for i in (0..n - 1).rev() {
            result = result * x + self.coeffs[i];
        }
        result
    }

    pub fn eval_vector(&self, xs: &DVector<f64>) -> DVector<f64> {
        xs.map(|x| self.eval(x))
    }
}

/// Least-squares fit of a degree-`degree` polynomial through the samples.
pub fn polyfit(x: &DVector<f64>, y: &DVector<f64>, degree: usize) -> Result<Polynomial, FitError> {
    if x.len() != y.len() {
        return Err(FitError::ShapeMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.is_empty() {
        return Err(FitError::TooFewPoints { needed: 1, got: 0 });
    }
    if degree + 1 > x.len() {
        return Err(FitError::DegreeTooHigh {
            degree,
            points: x.len(),
        });
    }

    let vandermonde = DMatrix::from_fn(x.len(), degree + 1, |i, j| x[i].powi(j as i32));
    let svd = vandermonde.svd(true, true);
    let coeffs = svd.solve(y, 1e-12).map_err(|_| FitError::Singular)?;
    Ok(Polynomial::new(coeffs))
}

/// Exact interpolation: the unique degree n−1 polynomial through n points.
pub fn interpolating_polynomial(
    x: &DVector<f64>,
    y: &DVector<f64>,
) -> Result<Polynomial, FitError> {
    if x.len() != y.len() {
        return Err(FitError::ShapeMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.is_empty() {
        return Err(FitError::TooFewPoints { needed: 1, got: 0 });
    }
    polyfit(x, y, x.len() - 1)
}

/// Least-squares straight line through the samples.
pub fn linear_regression(x: &DVector<f64>, y: &DVector<f64>) -> Result<Polynomial, FitError> {
    if x.len() != y.len() {
        return Err(FitError::ShapeMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(FitError::TooFewPoints {
            needed: 2,
            got: x.len(),
        });
    }
    polyfit(x, y, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolation_reproduces_square_numbers() {
        // the UI's default data set: y = x^2
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let y = DVector::from_vec(vec![1.0, 4.0, 9.0, 16.0]);
        let poly = interpolating_polynomial(&x, &y).unwrap();
        assert_eq!(poly.degree(), 3);
        // passes exactly through every sample
        for i in 0..x.len() {
            assert_relative_eq!(poly.eval(x[i]), y[i], epsilon = 1e-8);
        }
        // and matches x^2 between samples, since the cubic term is zero
        assert_relative_eq!(poly.eval(2.5), 6.25, epsilon = 1e-8);
    }

    #[test]
    fn test_regression_recovers_line() {
        let x = DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0]);
        let y = DVector::from_vec(vec![1.0, 3.0, 5.0, 7.0]);
        let line = linear_regression(&x, &y).unwrap();
        assert_eq!(line.degree(), 1);
        assert_relative_eq!(line.coefficients()[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(line.coefficients()[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_regression_takes_trend_through_scatter() {
        let x = DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0]);
        let y = DVector::from_vec(vec![0.1, 0.9, 2.1, 2.9]);
        let line = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(line.coefficients()[1], 1.0, epsilon = 0.1);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let y = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            polyfit(&x, &y, 1),
            Err(FitError::ShapeMismatch { x_len: 3, y_len: 2 })
        ));
        assert!(interpolating_polynomial(&x, &y).is_err());
        assert!(linear_regression(&x, &y).is_err());
    }

    #[test]
    fn test_degree_too_high_rejected() {
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let y = DVector::from_vec(vec![1.0, 4.0]);
        assert!(matches!(
            polyfit(&x, &y, 2),
            Err(FitError::DegreeTooHigh { degree: 2, points: 2 })
        ));
    }

    #[test]
    fn test_regression_needs_two_points() {
        let x = DVector::from_vec(vec![1.0]);
        let y = DVector::from_vec(vec![1.0]);
        assert!(matches!(
            linear_regression(&x, &y),
            Err(FitError::TooFewPoints { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn test_horner_matches_naive_evaluation() {
        let poly = Polynomial::new(DVector::from_vec(vec![1.0, -2.0, 0.5, 3.0]));
        for &x in &[-2.0, -0.5, 0.0, 1.3, 4.0] {
            let naive = 1.0 - 2.0 * x + 0.5 * x * x + 3.0 * x * x * x;
            assert_relative_eq!(poly.eval(x), naive, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_eval_vector_keeps_length() {
        let poly = Polynomial::new(DVector::from_vec(vec![0.0, 1.0]));
        let xs = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(poly.eval_vector(&xs), xs);
    }
}
