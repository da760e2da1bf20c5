//! # Root-Finding API
//!
//! Shared contract of the three root-finding methods plus the [`RootFinder`]
//! driver struct that the UI layer talks to.
//!
//! Every method produces the same tagged outcome: either a [`RootSolve`]
//! carrying the full iteration record and a soft terminal status
//! (`Converged` or `MaxIterationsReached` — the latter still holds a usable
//! approximate root), or a [`SolveFailure`] naming the violated condition.
//! Failures never panic and never lose the rows recorded before the abort.
//!
//! ## Example
//! ```
//! use numerik::numerical::root_api::{RootFinder, RootMethod, RootStatus};
//!
//! let mut finder = RootFinder::new(RootMethod::Bisection);
//! finder.parse_function("x**2 - 4").unwrap();
//! finder.set_bracket(-3.0, 0.0);
//! finder.set_params(1e-3, 50);
//! let solve = finder.solve().unwrap();
//! assert_eq!(solve.status, RootStatus::Converged);
//! assert!((solve.root + 2.0).abs() < 1e-2);
//! ```

use log::{error, info};
use strum_macros::{Display, EnumString};
use tabled::{builder::Builder, settings::Style};

use crate::Utils::logger::init_logging;
use crate::expression::function_handle::FunctionHandle;
use crate::expression::parse_expr::ExprError;
use crate::numerical::NR::newton_raphson;
use crate::numerical::bisection::bisection;
use crate::numerical::secant::secant;
use thiserror::Error;

/// Method selector as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum RootMethod {
    Bisection,
    NewtonRaphson,
    Secant,
}

/// Soft terminal states. `MaxIterationsReached` is not a failure: the
/// record and the last estimate are returned for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RootStatus {
    #[strum(to_string = "Converged")]
    Converged,
    #[strum(to_string = "Maximum iterations reached")]
    MaxIterationsReached,
}

/// Hard failures. Each message states the violated condition and a
/// corrective hint for the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveFailure {
    #[error(
        "no root is bracketed by [{a}, {b}]: f(a)*f(b) = {product} is not negative. Narrow or shift the bracket until the signs at the endpoints differ"
    )]
    InvalidBracket { a: f64, b: f64, product: f64 },
    #[error(
        "derivative vanished at x = {x} (df = {derivative}): the tangent is horizontal and the update divides by zero. Use a different initial guess"
    )]
    DerivativeVanished { x: f64, derivative: f64 },
    #[error(
        "secant denominator vanished at x1 = {x1} (f(x1) - f(x0) = {denominator}). Choose starting points with distinct function values"
    )]
    DenominatorVanished { x1: f64, denominator: f64 },
    #[error(
        "f({x}) is not a finite number; the iteration left the function domain. Adjust the bracket or the initial guess"
    )]
    EvaluationError { x: f64, partial: IterationRecord },
}

/// One iteration row: 1-based index plus the four method-specific values.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRow {
    pub index: usize,
    pub values: [f64; 4],
}

/// Append-only, ordered record of the iterations of a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub method: RootMethod,
    pub rows: Vec<IterationRow>,
}

impl IterationRecord {
    pub fn new(method: RootMethod) -> IterationRecord {
        IterationRecord {
            method,
            rows: Vec::new(),
        }
    }

    /// Fixed column names per method, matching what the UI table shows.
    pub fn headers(&self) -> [&'static str; 5] {
        match self.method {
            RootMethod::Bisection => ["Iter", "a", "b", "c", "f(c)"],
            RootMethod::NewtonRaphson => ["Iter", "x_old", "f(x)", "x_new", "Delta"],
            RootMethod::Secant => ["Iter", "x0", "x1", "x2", "f(x2)"],
        }
    }

    pub fn push(&mut self, values: [f64; 4]) {
        let index = self.rows.len() + 1;
        self.rows.push(IterationRow { index, values });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&IterationRow> {
        self.rows.last()
    }

    /// Render the record as a text table.
    pub fn table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers());
        for row in &self.rows {
            builder.push_record([
                row.index.to_string(),
                row.values[0].to_string(),
                row.values[1].to_string(),
                row.values[2].to_string(),
                row.values[3].to_string(),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

/// Successful (or soft-terminated) run: the record plus summary scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct RootSolve {
    pub record: IterationRecord,
    pub status: RootStatus,
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
}

/// Evaluate f at x, converting a non-finite value into the typed failure
/// that carries the rows recorded so far.
pub(crate) fn checked_eval(
    f: &FunctionHandle,
    x: f64,
    record: &IterationRecord,
) -> Result<f64, SolveFailure> {
    let y = f.eval(x);
    if y.is_finite() {
        Ok(y)
    } else {
        Err(SolveFailure::EvaluationError {
            x,
            partial: record.clone(),
        })
    }
}

/// Driver struct around the three methods, in the new/setters/solve shape.
pub struct RootFinder {
    pub method: RootMethod,
    pub function: Option<FunctionHandle>,
    pub lower: f64,
    pub upper: f64,
    pub x0: f64,
    pub x1: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub loglevel: Option<String>,
    pub result: Option<RootSolve>,
}

impl RootFinder {
    pub fn new(method: RootMethod) -> RootFinder {
        RootFinder {
            method,
            function: None,
            lower: 0.0,
            upper: 0.0,
            x0: 0.0,
            x1: 0.0,
            tolerance: 1e-3,
            max_iterations: 100,
            loglevel: None,
            result: None,
        }
    }

    pub fn parse_function(&mut self, input: &str) -> Result<(), ExprError> {
        self.function = Some(FunctionHandle::parse(input)?);
        Ok(())
    }

    pub fn set_function(&mut self, function: FunctionHandle) {
        self.function = Some(function);
    }

    pub fn set_bracket(&mut self, a: f64, b: f64) {
        self.lower = a;
        self.upper = b;
    }

    pub fn set_initial_guess(&mut self, x0: f64) {
        self.x0 = x0;
    }

    pub fn set_initial_pair(&mut self, x0: f64, x1: f64) {
        self.x0 = x0;
        self.x1 = x1;
    }

    pub fn set_params(&mut self, tolerance: f64, max_iterations: usize) {
        assert!(tolerance > 0.0, "Tolerance should be a positive number.");
        assert!(
            max_iterations > 0,
            "Max iterations should be a positive number."
        );
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
    }

    pub fn set_loglevel(&mut self, loglevel: Option<String>) {
        if let Some(level) = &loglevel {
            assert!(
                ["debug", "info", "warn", "error", "off", "none"].contains(&level.as_str()),
                "loglevel must be debug/info, warn, error or off"
            );
        }
        self.loglevel = loglevel;
    }

    /// Dispatch to the selected method and keep the outcome.
    pub fn main_loop(&mut self) -> Result<RootSolve, SolveFailure> {
        let f = self
            .function
            .as_ref()
            .expect("no function set; call parse_function or set_function first");
        let outcome = match self.method {
            RootMethod::Bisection => bisection(
                f,
                self.lower,
                self.upper,
                self.tolerance,
                self.max_iterations,
            ),
            RootMethod::NewtonRaphson => {
                newton_raphson(f, self.x0, self.tolerance, self.max_iterations)
            }
            RootMethod::Secant => secant(f, self.x0, self.x1, self.tolerance, self.max_iterations),
        };
        match &outcome {
            Ok(solve) => {
                self.result = Some(solve.clone());
                info!(
                    "{}: {} after {} iterations, root = {}, residual = {}",
                    self.method, solve.status, solve.iterations, solve.root, solve.residual
                );
            }
            Err(failure) => {
                self.result = None;
                error!("{}: {}", self.method, failure);
            }
        }
        outcome
    }

    /// Wrapper around [`RootFinder::main_loop`] that sets up terminal
    /// logging first.
    pub fn solve(&mut self) -> Result<RootSolve, SolveFailure> {
        init_logging(self.loglevel.as_deref());
        self.main_loop()
    }

    pub fn get_result(&self) -> Option<&RootSolve> {
        self.result.as_ref()
    }

    /// Iteration table plus a summary table, ready for display.
    pub fn report(&self) -> Option<String> {
        let solve = self.result.as_ref()?;
        let mut builder = Builder::default();
        builder.push_record(["method", "status", "root", "residual", "iterations"]);
        builder.push_record([
            self.method.to_string(),
            solve.status.to_string(),
            solve.root.to_string(),
            solve.residual.to_string(),
            solve.iterations.to_string(),
        ]);
        let mut summary = builder.build();
        summary.with(Style::modern_rounded());
        Some(format!("{}\n{}", solve.record.table(), summary))
    }
}
