//! Domain types used throughout the simulation.
//!
//! This module defines:
//!
//! - the phase-space state (`State`) and physical parameters (`LorenzParams`)
//! - the fixed time grid (`TimeGrid`) and integrator selection (`IntegrationOrder`)
//! - a full run configuration (`SimConfig`) and its output (`Trajectory`)

pub mod trajectory;
pub mod types;

pub use trajectory::*;
pub use types::*;
