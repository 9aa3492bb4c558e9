//! Fixed-grid trajectory evolution.
//!
//! The evolver owns the parameters and the grid for a run. `evolve` writes the
//! initial state at row 0 and then applies exactly one step per row:
//!
//! ```text
//! r[i+1] = r[i] + step(r[i], dt)
//! ```
//!
//! Each call allocates a fresh trajectory, so the evolver itself never carries
//! state from one run to the next.

use tracing::{debug, warn};

use crate::domain::{IntegrationOrder, LorenzParams, SimConfig, State, TimeGrid, Trajectory};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evolver {
    params: LorenzParams,
    grid: TimeGrid,
}

impl Evolver {
    pub fn new(params: LorenzParams, grid: TimeGrid) -> Result<Self, AppError> {
        grid.validate()?;
        Ok(Self { params, grid })
    }

    pub fn params(&self) -> &LorenzParams {
        &self.params
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Integrate from `initial` over the whole grid.
    pub fn evolve(&self, initial: State, order: IntegrationOrder) -> Trajectory {
        let n = self.grid.points;
        let dt = self.grid.dt();
        let step = order.stepper();

        debug!(
            points = n,
            dt,
            order = order.order(),
            "evolving trajectory"
        );

        let mut states = Vec::with_capacity(n);
        states.push(initial);
        for i in 0..n.saturating_sub(1) {
            let now = states[i];
            states.push(now + step(&now, dt, &self.params));
        }

        let trajectory = Trajectory::from_parts(self.grid.times(), states);
        if let Some(idx) = trajectory.first_non_finite() {
            warn!(row = idx, "trajectory diverged to non-finite values");
        }
        trajectory
    }

    /// Like `evolve`, but takes the raw order value (1, 2 or 4).
    ///
    /// Any other value is a configuration error and no trajectory is produced.
    pub fn evolve_with_order(&self, initial: State, order: u8) -> Result<Trajectory, AppError> {
        let order = IntegrationOrder::from_order(order)?;
        Ok(self.evolve(initial, order))
    }
}

/// Validate `config` and evolve it.
pub fn evolve_config(config: &SimConfig) -> Result<Trajectory, AppError> {
    let evolver = Evolver::new(config.params, config.grid)?;
    Ok(evolver.evolve(config.initial, config.order))
}
