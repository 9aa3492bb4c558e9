//! Shared "run pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! config -> evolve -> (optional) export
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;

use tracing::info;

use crate::domain::{SimConfig, Trajectory};
use crate::error::AppError;
use crate::integrate::evolve_config;
use crate::io::write_trajectory_csv;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub config: SimConfig,
    pub trajectory: Trajectory,
}

/// Evolve `config` and bundle it with its trajectory.
pub fn run_simulation(config: &SimConfig) -> Result<RunOutput, AppError> {
    info!(
        sigma = config.params.sigma,
        beta = config.params.beta,
        rho = config.params.rho,
        points = config.grid.points,
        order = config.order.order(),
        "running simulation"
    );
    let trajectory = evolve_config(config)?;
    Ok(RunOutput {
        config: config.clone(),
        trajectory,
    })
}

/// Write the run's trajectory to `path`.
pub fn export_run(run: &RunOutput, path: &Path) -> Result<(), AppError> {
    write_trajectory_csv(path, &run.trajectory)
}
