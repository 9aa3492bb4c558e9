//! Time integration of the Lorenz system.
//!
//! Responsibilities:
//!
//! - single-step increments for each explicit scheme (`stepper`)
//! - stepping a full fixed grid into a `Trajectory` (`evolver`)
//! - independent runs in parallel: parameter sweeps, perturbed ensembles (`ensemble`)

pub mod ensemble;
pub mod evolver;
pub mod stepper;

pub use ensemble::*;
pub use evolver::*;
pub use stepper::*;
