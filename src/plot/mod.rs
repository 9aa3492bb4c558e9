//! Trajectory views and terminal plotting.
//!
//! The views only read a finished `Trajectory`; nothing in the simulation
//! depends on them.

pub mod ascii;
pub mod view;

pub use ascii::*;
pub use view::*;
