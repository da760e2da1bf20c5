//! # Function Handle Module
//!
//! Expression tree and callable handle for formulas in one free variable.
//! A user-supplied string such as `"x**2 - 4"` or `"sin(x) + 1"` is parsed
//! into an [`Expr`] tree (see `parse_expr`) and wrapped into a
//! [`FunctionHandle`] that evaluates like a plain Rust function, both on a
//! scalar and elementwise on a vector of samples.
//!
//! The vocabulary is fixed: the free variable, the functions
//! sin, cos, tan, exp, log, sqrt, abs and the constants pi and e. Nothing
//! outside this vocabulary can be constructed by the parser, so a handle
//! never executes anything but plain arithmetic.
//!
//! Construction runs a throwaway probe evaluation over `[0.0, 1.0, 2.0]`;
//! a NaN result at any probe point fails construction with a typed
//! evaluation error. Infinite values pass the probe (log(0) = -inf is a
//! domain edge, not a broken expression) and are rejected later by the
//! solvers at the point of use.

#![allow(non_camel_case_types)]

use std::fmt;

use nalgebra::DVector;

use crate::expression::parse_expr::{ExprError, parse_expression};

/// Inputs used for the throwaway construction probe.
pub const PROBE_SAMPLE: [f64; 3] = [0.0, 1.0, 2.0];

/// Expression tree for a formula in one free variable.
///
/// Boxed recursive enum; evaluation is an exhaustive match. The `tg`
/// variant holds what the surface syntax calls `tan`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// The free variable.
    Var(String),
    /// Numerical constant (also produced by `pi` and `e`).
    Const(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// Power operation, written `**` in the surface syntax.
    Pow(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
    /// Natural logarithm, written `log` in the surface syntax.
    Ln(Box<Expr>),
    Sqrt(Box<Expr>),
    Abs(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    tg(Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ** {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "log({})", expr),
            Expr::Sqrt(expr) => write!(f, "sqrt({})", expr),
            Expr::Abs(expr) => write!(f, "abs({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tan({})", expr),
        }
    }
}

impl Expr {
    pub fn boxed(self) -> Box<Expr> {
        Box::new(self)
    }

    /// Evaluate the tree at `x`.
    ///
    /// Pure f64 arithmetic: domain violations surface as NaN or infinity,
    /// never as a panic.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Var(_) => x,
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval(x) + rhs.eval(x),
            Expr::Sub(lhs, rhs) => lhs.eval(x) - rhs.eval(x),
            Expr::Mul(lhs, rhs) => lhs.eval(x) * rhs.eval(x),
            Expr::Div(lhs, rhs) => lhs.eval(x) / rhs.eval(x),
            Expr::Pow(base, exp) => base.eval(x).powf(exp.eval(x)),
            Expr::Exp(expr) => expr.eval(x).exp(),
            Expr::Ln(expr) => expr.eval(x).ln(),
            Expr::Sqrt(expr) => expr.eval(x).sqrt(),
            Expr::Abs(expr) => expr.eval(x).abs(),
            Expr::sin(expr) => expr.eval(x).sin(),
            Expr::cos(expr) => expr.eval(x).cos(),
            Expr::tg(expr) => expr.eval(x).tan(),
        }
    }
}

/// A parsed, probe-checked formula in one free variable.
///
/// # Example
/// ```
/// use numerik::expression::function_handle::FunctionHandle;
///
/// let f = FunctionHandle::parse("x**2 - 4").unwrap();
/// assert_eq!(f.eval(3.0), 5.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionHandle {
    expr: Expr,
    variable: String,
}

impl FunctionHandle {
    /// Parse a formula with `x` as the free variable.
    pub fn parse(input: &str) -> Result<FunctionHandle, ExprError> {
        FunctionHandle::parse_with_variable(input, "x")
    }

    /// Parse a formula with a caller-chosen variable name.
    pub fn parse_with_variable(input: &str, variable: &str) -> Result<FunctionHandle, ExprError> {
        let expr = parse_expression(input, variable)?;
        let handle = FunctionHandle {
            expr,
            variable: variable.to_string(),
        };
        handle.probe()?;
        Ok(handle)
    }

    /// Throwaway evaluation over [`PROBE_SAMPLE`]; fails fast on NaN so a
    /// broken expression is reported at construction, not mid-solve.
    fn probe(&self) -> Result<(), ExprError> {
        for &x in PROBE_SAMPLE.iter() {
            let y = self.eval(x);
            if y.is_nan() {
                return Err(ExprError::Evaluation {
                    input: x,
                    cause: format!("f({}) evaluated to NaN during the trial run", x),
                });
            }
        }
        Ok(())
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.expr.eval(x)
    }

    /// Elementwise evaluation; the result has the same length as `xs`.
    pub fn eval_vector(&self, xs: &DVector<f64>) -> DVector<f64> {
        xs.map(|x| self.eval(x))
    }

    /// Borrow the handle as a plain closure for hot loops.
    pub fn lambdify(&self) -> impl Fn(f64) -> f64 + '_ {
        move |x| self.expr.eval(x)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl fmt::Display for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "f({}) = {}", self.variable, self.expr)
    }
}
