pub mod NR;
pub mod bisection;
pub mod error_metrics;
pub mod euler;
pub mod polyfit;
pub mod root_api;
pub mod secant;
pub mod trapezoid;
