//! Input/output helpers.
//!
//! - trajectory CSV export (`export`)
//! - simulation config JSON read/write (`config`)

pub mod config;
pub mod export;

pub use config::*;
pub use export::*;
