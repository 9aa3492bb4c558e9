//! `lorenz-attractor` library crate.
//!
//! The binary (`lorenz`) is a thin wrapper around this library so that:
//!
//! - the integrators are testable without spawning processes
//! - simulation code never depends on the plotting or terminal layers

pub mod app;
pub mod cli;
pub mod domain;
pub mod dynamics;
pub mod error;
pub mod integrate;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
