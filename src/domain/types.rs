//! Simulation configuration types.
//!
//! These types are small, `Copy` where possible, and serializable so a run can
//! be described in a JSON config file and reproduced exactly.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A point `(x, y, z)` in phase space.
pub type State = Vector3<f64>;

/// Initial condition used when none is supplied.
pub const DEFAULT_INITIAL_STATE: [f64; 3] = [0.1, 0.0, 0.0];

/// The default initial condition as a `State`.
pub fn default_initial_state() -> State {
    State::from(DEFAULT_INITIAL_STATE)
}

/// Lorenz system parameters.
///
/// Classical chaos occurs at σ=10, β=8/3, ρ=28.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorenzParams {
    pub sigma: f64,
    pub beta: f64,
    pub rho: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            beta: 8.0 / 3.0,
            rho: 28.0,
        }
    }
}

/// Largest accepted grid; each row holds a time and a 3-vector.
pub const MAX_POINTS: usize = 10_000_000;

/// A uniform time grid of `points` samples between `start` and `end`.
///
/// The step size is `(end - start) / points` while the sample times are spread
/// over `[start, end]` inclusive. The two differ by a factor of
/// `points / (points - 1)`; integration uses `dt()` and exports use `times()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeGrid {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 80.0,
            points: 10_000,
        }
    }
}

impl TimeGrid {
    pub fn new(start: f64, end: f64, points: usize) -> Result<Self, AppError> {
        let grid = Self { start, end, points };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.points == 0 {
            return Err(AppError::config("Grid must have at least one point."));
        }
        if self.points > MAX_POINTS {
            return Err(AppError::config(format!(
                "Grid has {} points; at most {MAX_POINTS} are supported.",
                self.points
            )));
        }
        if !(self.start.is_finite() && self.end.is_finite() && self.end > self.start) {
            return Err(AppError::config(format!(
                "Invalid time range: start={}, end={} (must be finite and end>start).",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Fixed integration step.
    pub fn dt(&self) -> f64 {
        (self.end - self.start) / self.points as f64
    }

    /// Sample times, `start` to `end` inclusive.
    pub fn times(&self) -> Vec<f64> {
        let n = self.points;
        match n {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => {
                let step = (self.end - self.start) / (n as f64 - 1.0);
                let mut out: Vec<f64> = (0..n).map(|i| self.start + step * i as f64).collect();
                out[n - 1] = self.end;
                out
            }
        }
    }
}

/// Explicit time-stepping scheme, named by its order of accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum IntegrationOrder {
    /// First-order forward (Euler) step.
    Forward,
    /// Second-order midpoint step.
    Midpoint,
    /// Classical fourth-order Runge-Kutta.
    #[default]
    Rk4,
}

impl IntegrationOrder {
    pub const ALL: [IntegrationOrder; 3] = [
        IntegrationOrder::Forward,
        IntegrationOrder::Midpoint,
        IntegrationOrder::Rk4,
    ];

    /// Map a raw order value (1, 2 or 4) to a scheme.
    pub fn from_order(order: u8) -> Result<Self, AppError> {
        match order {
            1 => Ok(IntegrationOrder::Forward),
            2 => Ok(IntegrationOrder::Midpoint),
            4 => Ok(IntegrationOrder::Rk4),
            other => Err(AppError::config(format!(
                "Unknown integration order {other} (expected 1, 2 or 4)."
            ))),
        }
    }

    pub fn order(self) -> u8 {
        match self {
            IntegrationOrder::Forward => 1,
            IntegrationOrder::Midpoint => 2,
            IntegrationOrder::Rk4 => 4,
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            IntegrationOrder::Forward => "Forward Euler",
            IntegrationOrder::Midpoint => "Midpoint (RK2)",
            IntegrationOrder::Rk4 => "Runge-Kutta 4",
        }
    }

    /// Derivative evaluations per step.
    pub fn evaluations_per_step(self) -> usize {
        match self {
            IntegrationOrder::Forward => 1,
            IntegrationOrder::Midpoint => 2,
            IntegrationOrder::Rk4 => 4,
        }
    }

    /// The next scheme in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        match self {
            IntegrationOrder::Forward => IntegrationOrder::Midpoint,
            IntegrationOrder::Midpoint => IntegrationOrder::Rk4,
            IntegrationOrder::Rk4 => IntegrationOrder::Forward,
        }
    }
}

impl TryFrom<u8> for IntegrationOrder {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_order(value)
    }
}

impl From<IntegrationOrder> for u8 {
    fn from(value: IntegrationOrder) -> Self {
        value.order()
    }
}

/// A full run's configuration.
///
/// Built from CLI flags on top of an optional JSON config file and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub params: LorenzParams,
    pub grid: TimeGrid,
    pub initial: State,
    pub order: IntegrationOrder,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            params: LorenzParams::default(),
            grid: TimeGrid::default(),
            initial: default_initial_state(),
            order: IntegrationOrder::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.grid.validate()
    }
}
