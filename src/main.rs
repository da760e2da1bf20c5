#![allow(non_snake_case)]
use nalgebra::{DMatrix, DVector};
use numerik::Utils::tips::random_tip;
use numerik::expression::function_handle::FunctionHandle;
use numerik::numerical::error_metrics::{absolute_error, relative_error_percent};
use numerik::numerical::euler::RcCircuit;
use numerik::numerical::polyfit::{interpolating_polynomial, linear_regression};
use numerik::numerical::root_api::{RootFinder, RootMethod};
use numerik::numerical::trapezoid::integrate;
use numerik::somelinalg::dense::solve_dense;

fn main() {
    let example = 2;
    match example {
        0 => {
            // ERROR ANALYSIS
            // before computing anything: how wrong is the answer allowed to be?
            let true_val = 100.0;
            let approx_val = 98.5;
            println!(
                "absolute error = {:.4}, relative error = {:.4}%",
                absolute_error(true_val, approx_val),
                relative_error_percent(true_val, approx_val)
            );
        }
        1 => {
            // EXPRESSION PARSING
            // parse a formula string into a callable and evaluate it on a grid
            let f = FunctionHandle::parse("sin(x) + 1").unwrap();
            println!("parsed: {}", f);
            let xs = DVector::from_fn(5, |i, _| i as f64);
            println!("f over {:?} = {:?}", xs.as_slice(), f.eval_vector(&xs).as_slice());
            // the classic beginner mistake gets its own diagnosis
            let err = FunctionHandle::parse("x^2 - 4").unwrap_err();
            println!("x^2 - 4 -> {}", err);
        }
        2 => {
            // ROOT FINDING, all three methods on the same parabola
            for method in [
                RootMethod::Bisection,
                RootMethod::NewtonRaphson,
                RootMethod::Secant,
            ] {
                let mut finder = RootFinder::new(method);
                finder.parse_function("x**2 - 4").unwrap();
                finder.set_bracket(-3.0, 0.0);
                finder.set_initial_guess(3.0);
                finder.set_initial_pair(0.0, 1.0);
                finder.set_params(1e-3, 50);
                finder.set_loglevel(Some("warn".to_string()));
                match finder.solve() {
                    Ok(_) => println!("{}", finder.report().unwrap()),
                    Err(failure) => println!("{}: {}", method, failure),
                }
            }
        }
        3 => {
            // LINEAR SYSTEM, the default 3x3 circuit system
            let a = DMatrix::from_row_slice(
                3,
                3,
                &[3.0, 2.0, -1.0, 2.0, -2.0, 4.0, -1.0, 0.5, -1.0],
            );
            let b = DVector::from_vec(vec![1.0, -2.0, 0.0]);
            match solve_dense(&a, &b) {
                Ok(report) => println!(
                    "x = {:?}, det = {:.4}, cond = {:.2}",
                    report.solution.as_slice(),
                    report.determinant,
                    report.condition_number
                ),
                Err(failure) => println!("{}", failure),
            }
        }
        4 => {
            // INTERPOLATION vs REGRESSION on the perfect-squares data
            let x = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
            let y = DVector::from_vec(vec![1.0, 4.0, 9.0, 16.0]);
            let exact = interpolating_polynomial(&x, &y).unwrap();
            let trend = linear_regression(&x, &y).unwrap();
            println!(
                "interpolation at 2.5 = {:.4}, regression at 2.5 = {:.4}",
                exact.eval(2.5),
                trend.eval(2.5)
            );
        }
        5 => {
            // TRAPEZOIDAL INTEGRATION of sin(x) + 1 over [0, pi]
            let f = FunctionHandle::parse("sin(x) + 1").unwrap();
            let q = integrate(&f, 0.0, std::f64::consts::PI, 10).unwrap();
            println!(
                "estimate = {:.5} over {} trapezoids (exact: {:.5})",
                q.estimate,
                q.segments(),
                2.0 + std::f64::consts::PI
            );
        }
        6 => {
            // RC CIRCUIT simulated with forward Euler: 10 kOhm, 100 uF, 5 V
            let mut circuit = RcCircuit::from_components(10_000.0, 100e-6, 5.0, 0.01);
            println!("tau = {:.2} s", circuit.time_constant());
            circuit.solve();
            let (t, vc) = circuit.get_result();
            println!(
                "Vc({:.2} s) = {:.4} V (analytic {:.4} V), max deviation {:.5}",
                t[t.len() - 1],
                vc[vc.len() - 1],
                circuit.analytic(t[t.len() - 1]),
                circuit.max_deviation_from_analytic()
            );
        }
        _ => {
            println!("tip: {}", random_tip());
        }
    }
}
