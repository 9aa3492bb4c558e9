//! Formatted terminal output for runs, sweeps, ensembles and order comparisons.
//!
//! We keep formatting code in one place so:
//! - the integration code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;
