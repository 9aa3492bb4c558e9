//! Lorenz vector field.
//!
//! Implemented as small, pure functions so the integrators can stay generic
//! over the scheme and only ever call `derivative`.

pub mod lorenz;

pub use lorenz::*;
