//! Absolute and relative error, the vocabulary everything else is judged
//! with.
//!
//! E_abs = |x_true − x_approx|; E_rel = |x_true − x_approx| / |x_true| as a
//! percentage. The relative error of a zero true value is defined as 0 so
//! the UI never divides by zero.

pub fn absolute_error(true_value: f64, approx: f64) -> f64 {
    (true_value - approx).abs()
}

pub fn relative_error_percent(true_value: f64, approx: f64) -> f64 {
    if true_value == 0.0 {
        0.0
    } else {
        absolute_error(true_value, approx) / true_value.abs() * 100.0
    }
}
