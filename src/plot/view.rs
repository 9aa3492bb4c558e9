//! The seven standard views of a trajectory.
//!
//! - time series: t–x, t–y, t–z
//! - phase-plane projections: x–y, y–z, z–x
//! - a 3D x–y–z scatter, projected orthographically onto the screen plane

use clap::ValueEnum;

use crate::domain::{State, Trajectory};

/// Camera azimuth (radians, about the z axis) for the 3D view.
pub const AZIMUTH: f64 = std::f64::consts::FRAC_PI_4;
/// Camera elevation (radians above the x–y plane) for the 3D view.
pub const ELEVATION: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum View {
    Tx,
    Ty,
    Tz,
    Xy,
    Yz,
    Zx,
    Xyz,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Tx,
        View::Ty,
        View::Tz,
        View::Xy,
        View::Yz,
        View::Zx,
        View::Xyz,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Tx => "t vs x",
            View::Ty => "t vs y",
            View::Tz => "t vs z",
            View::Xy => "x vs y",
            View::Yz => "y vs z",
            View::Zx => "z vs x",
            View::Xyz => "x-y-z scatter",
        }
    }

    /// Horizontal and vertical axis names.
    pub fn axes(self) -> (&'static str, &'static str) {
        match self {
            View::Tx => ("t", "x"),
            View::Ty => ("t", "y"),
            View::Tz => ("t", "z"),
            View::Xy => ("x", "y"),
            View::Yz => ("y", "z"),
            View::Zx => ("z", "x"),
            View::Xyz => ("u", "v"),
        }
    }

    /// Drawn as unconnected points rather than a line.
    pub fn is_scatter(self) -> bool {
        matches!(self, View::Xyz)
    }

    pub fn next(self) -> Self {
        let idx = View::ALL.iter().position(|&v| v == self).unwrap_or(0);
        View::ALL[(idx + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = View::ALL.iter().position(|&v| v == self).unwrap_or(0);
        View::ALL[(idx + View::ALL.len() - 1) % View::ALL.len()]
    }

    /// The `(horizontal, vertical)` series for this view, one pair per row.
    pub fn series(self, trajectory: &Trajectory) -> Vec<(f64, f64)> {
        let t = trajectory.t();
        let s = trajectory.states();
        match self {
            View::Tx => t.iter().zip(s).map(|(&t, s)| (t, s.x)).collect(),
            View::Ty => t.iter().zip(s).map(|(&t, s)| (t, s.y)).collect(),
            View::Tz => t.iter().zip(s).map(|(&t, s)| (t, s.z)).collect(),
            View::Xy => s.iter().map(|s| (s.x, s.y)).collect(),
            View::Yz => s.iter().map(|s| (s.y, s.z)).collect(),
            View::Zx => s.iter().map(|s| (s.z, s.x)).collect(),
            View::Xyz => s.iter().map(project).collect(),
        }
    }
}

/// Orthographic projection of a 3D state onto the screen plane.
pub fn project(state: &State) -> (f64, f64) {
    let (sa, ca) = AZIMUTH.sin_cos();
    let (se, ce) = ELEVATION.sin_cos();
    let u = state.x * ca - state.y * sa;
    let depth = state.x * sa + state.y * ca;
    let v = state.z * ce - depth * se;
    (u, v)
}
