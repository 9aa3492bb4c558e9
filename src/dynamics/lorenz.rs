//! The Lorenz equations.
//!
//! ```text
//! dx/dt = σ (y - x)
//! dy/dt = x (ρ - z) - y
//! dz/dt = x y - β z
//! ```

use crate::domain::{LorenzParams, State};

/// Instantaneous rate of change at `state`.
///
/// Total over the reals; NaN/Inf inputs propagate to the output untouched.
pub fn derivative(state: &State, params: &LorenzParams) -> State {
    let (x, y, z) = (state.x, state.y, state.z);
    State::new(
        params.sigma * (y - x),
        x * (params.rho - z) - y,
        x * y - params.beta * z,
    )
}

/// Equilibria of the system.
///
/// The origin always; for ρ > 1 also C± = (±√(β(ρ-1)), ±√(β(ρ-1)), ρ-1).
pub fn fixed_points(params: &LorenzParams) -> Vec<State> {
    let origin = State::zeros();
    if params.rho <= 1.0 {
        return vec![origin];
    }
    let c = (params.beta * (params.rho - 1.0)).sqrt();
    vec![
        origin,
        State::new(c, c, params.rho - 1.0),
        State::new(-c, -c, params.rho - 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_matches_reference_values() {
        let d = derivative(&State::new(1.0, 2.0, 3.0), &LorenzParams::default());
        assert!((d.x - 10.0).abs() < 1e-12);
        assert!((d.y - 23.0).abs() < 1e-12);
        assert!((d.z + 6.0).abs() < 1e-12);
    }

    #[test]
    fn derivative_uses_supplied_parameters() {
        let params = LorenzParams { sigma: 2.0, beta: 0.5, rho: 4.0 };
        let d = derivative(&State::new(3.0, -1.0, 2.0), &params);
        assert_eq!(d, State::new(2.0 * (-1.0 - 3.0), 3.0 * (4.0 - 2.0) + 1.0, -3.0 - 1.0));
    }

    #[test]
    fn derivative_vanishes_at_fixed_points() {
        let params = LorenzParams::default();
        let fps = fixed_points(&params);
        assert_eq!(fps.len(), 3);
        for p in &fps {
            assert!(derivative(p, &params).norm() < 1e-10);
        }
        assert!((fps[1].x + fps[2].x).abs() < 1e-12);
    }

    #[test]
    fn only_origin_below_critical_rho() {
        let params = LorenzParams { rho: 0.5, ..LorenzParams::default() };
        assert_eq!(fixed_points(&params), vec![State::zeros()]);
    }

    #[test]
    fn non_finite_input_propagates() {
        let d = derivative(&State::new(f64::NAN, 0.0, 0.0), &LorenzParams::default());
        assert!(d.x.is_nan());
        assert!(d.y.is_nan());
        assert!(d.z.is_nan());

        let d = derivative(&State::new(f64::INFINITY, 1.0, 0.0), &LorenzParams::default());
        assert_eq!(d.x, f64::NEG_INFINITY);
    }
}
