//! Explicit one-step schemes.
//!
//! Every scheme has the same shape: given a state and a step size, return the
//! increment to add to the state. They are pure and only call `derivative`.
//!
//! ```text
//! forward : Δ = f(r)·dt
//! midpoint: Δ = f(r + f(r)·dt/2)·dt
//! rk4     : Δ = (k1 + 2k2 + 2k3 + k4)·dt/6
//! ```

use crate::domain::{IntegrationOrder, LorenzParams, State};
use crate::dynamics::derivative;

/// Signature shared by all step schemes.
pub type StepFn = fn(&State, f64, &LorenzParams) -> State;

/// First-order forward step (one derivative evaluation).
pub fn forward_step(state: &State, dt: f64, params: &LorenzParams) -> State {
    derivative(state, params) * dt
}

/// Second-order midpoint step (two derivative evaluations).
pub fn midpoint_step(state: &State, dt: f64, params: &LorenzParams) -> State {
    let mid = state + derivative(state, params) * dt / 2.0;
    derivative(&mid, params) * dt
}

/// Classical fourth-order Runge-Kutta step (four derivative evaluations).
pub fn rk4_step(state: &State, dt: f64, params: &LorenzParams) -> State {
    let k1 = derivative(state, params);
    let k2 = derivative(&(state + k1 * dt / 2.0), params);
    let k3 = derivative(&(state + k2 * dt / 2.0), params);
    let k4 = derivative(&(state + k3 * dt), params);
    (k1 + k2 * 2.0 + k3 * 2.0 + k4) * dt / 6.0
}

impl IntegrationOrder {
    /// The step function for this scheme.
    pub fn stepper(self) -> StepFn {
        match self {
            IntegrationOrder::Forward => forward_step,
            IntegrationOrder::Midpoint => midpoint_step,
            IntegrationOrder::Rk4 => rk4_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.008;

    fn assert_close(actual: State, expected: [f64; 3], tol: f64) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < tol,
                "component {i}: got {}, expected {}",
                actual[i],
                expected[i]
            );
        }
    }

    #[test]
    fn forward_increment_reference() {
        let inc = forward_step(&State::new(1.0, 2.0, 3.0), DT, &LorenzParams::default());
        assert_close(inc, [0.08, 0.184, -0.048], 1e-12);
    }

    #[test]
    fn midpoint_increment_reference() {
        let inc = midpoint_step(&State::new(1.0, 2.0, 3.0), DT, &LorenzParams::default());
        assert_close(inc, [0.08416, 0.19146368, -0.04608256], 1e-10);
    }

    #[test]
    fn rk4_increment_reference() {
        let inc = rk4_step(&State::new(1.0, 2.0, 3.0), DT, &LorenzParams::default());
        assert_close(inc, [0.08425138, 0.19172248, -0.04604073], 1e-7);
    }

    #[test]
    fn dispatch_selects_matching_scheme() {
        let r = State::new(1.0, 2.0, 3.0);
        let params = LorenzParams::default();
        assert_eq!(IntegrationOrder::Forward.stepper()(&r, DT, &params), forward_step(&r, DT, &params));
        assert_eq!(IntegrationOrder::Midpoint.stepper()(&r, DT, &params), midpoint_step(&r, DT, &params));
        assert_eq!(IntegrationOrder::Rk4.stepper()(&r, DT, &params), rk4_step(&r, DT, &params));
    }

    #[test]
    fn steps_do_not_move_a_fixed_point() {
        let params = LorenzParams::default();
        for p in crate::dynamics::fixed_points(&params) {
            for order in IntegrationOrder::ALL {
                assert!(order.stepper()(&p, DT, &params).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn higher_order_schemes_converge_faster() {
        // Compare one step of each scheme against a finely resolved RK4 reference.
        let params = LorenzParams::default();
        let r = State::new(1.0, 2.0, 3.0);
        let h = 0.01;
        let fine = 1000;
        let mut reference = r;
        for _ in 0..fine {
            reference += rk4_step(&reference, h / fine as f64, &params);
        }
        let exact = reference - r;

        let e1 = (forward_step(&r, h, &params) - exact).norm();
        let e2 = (midpoint_step(&r, h, &params) - exact).norm();
        let e4 = (rk4_step(&r, h, &params) - exact).norm();
        assert!(e2 < e1);
        assert!(e4 < e2);
    }

    #[test]
    fn non_finite_state_yields_non_finite_increment() {
        let r = State::new(f64::NAN, 1.0, 1.0);
        for order in IntegrationOrder::ALL {
            let inc = order.stepper()(&r, DT, &LorenzParams::default());
            assert!(inc.iter().any(|v| v.is_nan()));
        }
    }
}
