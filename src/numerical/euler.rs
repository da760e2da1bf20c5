//! Forward (explicit) Euler simulation of an RC charging circuit.
//!
//! The model is dVc/dt = (Vin − Vc)/tau with Vc(0) = 0, tau = R*C. The
//! fixed-step update is
//!
//! ```text
//! Vc_{k+1} = Vc_k + h * (Vin - Vc_k) / tau
//! ```
//!
//! No adaptive error control: accuracy is purely a function of h. The ODE
//! has the closed form Vc(t) = Vin * (1 - exp(-t/tau)), kept available on
//! the solver for validation; the global Euler error shrinks linearly
//! with h.

use log::info;
use nalgebra::DVector;
use std::time::Instant;

/// Forward-Euler simulator for the RC step response.
pub struct RcCircuit {
    pub tau: f64,
    pub vin: f64,
    pub h: f64,
    pub steps: usize,
    t: f64,
    vc: f64,
    t_result: DVector<f64>,
    v_result: DVector<f64>,
    status: String,
}

impl RcCircuit {
    pub fn new() -> RcCircuit {
        RcCircuit {
            tau: 0.0,
            vin: 0.0,
            h: 0.0,
            steps: 0,
            t: 0.0,
            vc: 0.0,
            t_result: DVector::zeros(0),
            v_result: DVector::zeros(0),
            status: "created".to_string(),
        }
    }

    pub fn set_initial(&mut self, tau: f64, vin: f64, h: f64, steps: usize) {
        self.tau = tau;
        self.vin = vin;
        self.h = h;
        self.steps = steps;
        self.t = 0.0;
        self.vc = 0.0;
        self.status = "running".to_string();
        self.check();
    }

    /// Build from circuit components, the way the UI sliders hand them
    /// over: the simulated span is 5*tau (the capacitor is essentially
    /// full there).
    pub fn from_components(r_ohms: f64, c_farads: f64, vin: f64, h: f64) -> RcCircuit {
        let tau = r_ohms * c_farads;
        let t_max = 5.0 * tau;
        let steps = (t_max / h) as usize;
        let mut solver = RcCircuit::new();
        solver.set_initial(tau, vin, h, steps);
        solver
    }

    pub fn check(&self) {
        assert!(self.tau > 0.0, "time constant tau must be positive");
        assert!(self.h > 0.0, "step size h must be positive");
        assert!(self.steps >= 1, "at least one step is required");
        assert!(self.vin.is_finite(), "Vin must be a finite voltage");
    }

    pub fn time_constant(&self) -> f64 {
        self.tau
    }

    /// One fixed Euler step.
    fn step(&mut self) {
        let dvc_dt = (self.vin - self.vc) / self.tau;
        self.vc = self.vc + dvc_dt * self.h;
        self.t = self.t + self.h;
    }

    /// Run all steps, collecting exactly steps+1 samples including both
    /// endpoints.
    pub fn main_loop(&mut self) {
        let start = Instant::now();
        let mut t_vals: Vec<f64> = Vec::with_capacity(self.steps + 1);
        let mut vc_vals: Vec<f64> = Vec::with_capacity(self.steps + 1);
        t_vals.push(self.t);
        vc_vals.push(self.vc);
        for _ in 0..self.steps {
            self.step();
            t_vals.push(self.t);
            vc_vals.push(self.vc);
        }
        self.t_result = DVector::from_vec(t_vals);
        self.v_result = DVector::from_vec(vc_vals);
        self.status = "finished".to_string();
        let duration = start.elapsed();
        info!(
            "RC simulation took {} ms for {} steps",
            duration.as_millis(),
            self.steps
        );
    }

    pub fn solve(&mut self) {
        self.check();
        self.main_loop();
    }

    pub fn get_result(&self) -> (DVector<f64>, DVector<f64>) {
        (self.t_result.clone(), self.v_result.clone())
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Closed-form solution Vc(t) = Vin * (1 - exp(-t/tau)).
    pub fn analytic(&self, t: f64) -> f64 {
        self.vin * (1.0 - (-t / self.tau).exp())
    }

    /// Largest |simulated - analytic| over the trajectory.
    pub fn max_deviation_from_analytic(&self) -> f64 {
        self.t_result
            .iter()
            .zip(self.v_result.iter())
            .map(|(&t, &vc)| (vc - self.analytic(t)).abs())
            .fold(0.0, f64::max)
    }
}

impl Default for RcCircuit {
    fn default() -> Self {
        RcCircuit::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_circuit() -> RcCircuit {
        // tau = 1 s, Vin = 5 V, h = 10 ms, span 5*tau
        let mut solver = RcCircuit::new();
        solver.set_initial(1.0, 5.0, 0.01, 500);
        solver.solve();
        solver
    }

    #[test]
    fn test_sample_count_and_endpoints() {
        let solver = reference_circuit();
        let (t, vc) = solver.get_result();
        assert_eq!(t.len(), 501);
        assert_eq!(vc.len(), 501);
        assert_eq!(t[0], 0.0);
        assert_eq!(vc[0], 0.0);
        assert_relative_eq!(t[500], 5.0, epsilon = 1e-9);
        assert_eq!(solver.status(), "finished");
    }

    #[test]
    fn test_time_grid_is_uniform() {
        let solver = reference_circuit();
        let (t, _) = solver.get_result();
        for pair in t.as_slice().windows(2) {
            assert_relative_eq!(pair[1] - pair[0], 0.01, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_capacitor_nearly_full_at_five_tau() {
        let solver = reference_circuit();
        let (_, vc) = solver.get_result();
        let final_vc = vc[vc.len() - 1];
        // theory: Vc(5*tau) = 0.9933 * Vin
        assert!((final_vc - 0.99 * 5.0).abs() / 5.0 < 0.01);
    }

    #[test]
    fn test_tracks_analytic_curve() {
        let solver = reference_circuit();
        // global Euler error is proportional to h; for h = 0.01 and this
        // well-behaved ODE the deviation stays far below Vin
        assert!(solver.max_deviation_from_analytic() < 0.02);
    }

    #[test]
    fn test_halving_h_halves_the_error() {
        let mut coarse = RcCircuit::new();
        coarse.set_initial(1.0, 5.0, 0.02, 250);
        coarse.solve();
        let mut fine = RcCircuit::new();
        fine.set_initial(1.0, 5.0, 0.01, 500);
        fine.solve();
        let ratio = coarse.max_deviation_from_analytic() / fine.max_deviation_from_analytic();
        assert!(
            (1.5..2.5).contains(&ratio),
            "O(h): expected ratio near 2, got {}",
            ratio
        );
    }

    #[test]
    fn test_from_components_derives_tau_and_span() {
        // 10 kOhm, 100 uF: tau = 1 s
        let mut solver = RcCircuit::from_components(10_000.0, 100e-6, 5.0, 0.01);
        assert_relative_eq!(solver.time_constant(), 1.0, epsilon = 1e-12);
        assert_eq!(solver.steps, 500);
        solver.solve();
        let (t, _) = solver.get_result();
        assert_eq!(t.len(), 501);
    }

    #[test]
    fn test_monotone_charge_toward_vin() {
        let solver = reference_circuit();
        let (_, vc) = solver.get_result();
        for pair in vc.as_slice().windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(vc[vc.len() - 1] < 5.0);
    }

    #[test]
    #[should_panic(expected = "time constant")]
    fn test_zero_tau_is_rejected() {
        let mut solver = RcCircuit::new();
        solver.set_initial(0.0, 5.0, 0.01, 10);
    }
}
