//! The solution of one simulation run.

use super::types::State;

/// Per-axis value range (finite samples only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Range over the finite values of `values`, or `None` if there are none.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_finite() && max.is_finite() {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Time series of states, row-aligned with the grid's sample times.
///
/// Built only by the evolver, fully populated, and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    t: Vec<f64>,
    states: Vec<State>,
}

impl Trajectory {
    pub(crate) fn from_parts(t: Vec<f64>, states: Vec<State>) -> Self {
        debug_assert_eq!(t.len(), states.len());
        Self { t, states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn x(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.x).collect()
    }

    pub fn y(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.y).collect()
    }

    pub fn z(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.z).collect()
    }

    pub fn row(&self, i: usize) -> Option<(f64, State)> {
        Some((*self.t.get(i)?, *self.states.get(i)?))
    }

    pub fn first(&self) -> Option<(f64, State)> {
        self.row(0)
    }

    pub fn last(&self) -> Option<(f64, State)> {
        self.row(self.len().checked_sub(1)?)
    }

    /// Index of the first row with a NaN/Inf component.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.states
            .iter()
            .position(|s| !s.iter().all(|v| v.is_finite()))
    }

    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    /// Finite ranges of x, y and z.
    pub fn ranges(&self) -> [Option<AxisRange>; 3] {
        [0, 1, 2].map(|axis| AxisRange::of(self.states.iter().map(|s| s[axis])))
    }
}
