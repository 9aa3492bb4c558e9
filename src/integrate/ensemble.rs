//! Independent runs in parallel.
//!
//! Each run owns its own configuration and trajectory, so runs are evaluated
//! with rayon without any coordination. Results always come back in input
//! order regardless of scheduling.

use clap::ValueEnum;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::{AxisRange, IntegrationOrder, SimConfig, State, Trajectory};
use crate::error::AppError;
use crate::integrate::evolver::{Evolver, evolve_config};

/// Separation (phase-space distance) treated as "the runs have diverged".
pub const DIVERGENCE_THRESHOLD: f64 = 1.0;

/// Number of evenly spaced rows reported for an ensemble.
const CHECKPOINTS: usize = 10;

/// Which parameter a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SweepParam {
    Sigma,
    Beta,
    Rho,
}

impl SweepParam {
    pub fn symbol(self) -> &'static str {
        match self {
            SweepParam::Sigma => "sigma",
            SweepParam::Beta => "beta",
            SweepParam::Rho => "rho",
        }
    }

    fn apply(self, base: &SimConfig, value: f64) -> SimConfig {
        let mut config = base.clone();
        match self {
            SweepParam::Sigma => config.params.sigma = value,
            SweepParam::Beta => config.params.beta = value,
            SweepParam::Rho => config.params.rho = value,
        }
        config
    }
}

/// Summary of one sweep member.
#[derive(Debug, Clone)]
pub struct SweepRun {
    pub value: f64,
    pub config: SimConfig,
    pub final_state: State,
    pub ranges: [Option<AxisRange>; 3],
    pub first_non_finite: Option<usize>,
}

/// Evolve `base` once per value of `param`, in parallel.
pub fn sweep(base: &SimConfig, param: SweepParam, values: &[f64]) -> Result<Vec<SweepRun>, AppError> {
    if values.is_empty() {
        return Err(AppError::config("Sweep needs at least one value."));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(AppError::config(format!("Sweep value {bad} is not finite.")));
    }
    base.validate()?;

    info!(param = param.symbol(), runs = values.len(), "starting parameter sweep");

    values
        .par_iter()
        .map(|&value| -> Result<SweepRun, AppError> {
            let config = param.apply(base, value);
            let traj = evolve_config(&config)?;
            Ok(SweepRun {
                value,
                final_state: final_state(&traj),
                ranges: traj.ranges(),
                first_non_finite: traj.first_non_finite(),
                config,
            })
        })
        .collect()
}

/// Mean/max separation of the ensemble from the reference run at one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleCheckpoint {
    pub index: usize,
    pub t: f64,
    pub mean_separation: f64,
    pub max_separation: f64,
}

#[derive(Debug, Clone)]
pub struct EnsembleResult {
    pub members: usize,
    pub spread: f64,
    pub seed: u64,
    pub reference_final: State,
    pub checkpoints: Vec<EnsembleCheckpoint>,
    /// First sample time at which the mean separation exceeds `DIVERGENCE_THRESHOLD`.
    pub divergence_time: Option<f64>,
    /// Members (reference excluded) whose trajectory left the finite range.
    pub non_finite_members: usize,
}

/// Evolve `members` copies of `base` whose initial states carry Gaussian noise
/// of standard deviation `spread`, and track how far they drift from the
/// unperturbed reference.
///
/// Deterministic for a given `seed`.
pub fn ensemble(base: &SimConfig, members: usize, spread: f64, seed: u64) -> Result<EnsembleResult, AppError> {
    if members == 0 {
        return Err(AppError::config("Ensemble needs at least one member."));
    }
    if !(spread.is_finite() && spread > 0.0) {
        return Err(AppError::config(format!(
            "Ensemble spread must be finite and > 0 (got {spread})."
        )));
    }
    let evolver = Evolver::new(base.params, base.grid)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, spread)
        .map_err(|e| AppError::config(format!("Perturbation distribution error: {e}")))?;
    let initials: Vec<State> = (0..members)
        .map(|_| {
            base.initial
                + State::new(normal.sample(&mut rng), normal.sample(&mut rng), normal.sample(&mut rng))
        })
        .collect();

    info!(members, spread, seed, "starting perturbed ensemble");

    let (reference, runs) = rayon::join(
        || evolver.evolve(base.initial, base.order),
        || {
            initials
                .par_iter()
                .map(|&r0| evolver.evolve(r0, base.order))
                .collect::<Vec<_>>()
        },
    );

    let n = reference.len();
    let separation_at = |i: usize| -> (f64, f64) {
        let seps: Vec<f64> = runs
            .iter()
            .map(|run| (run.states()[i] - reference.states()[i]).norm())
            .filter(|d| d.is_finite())
            .collect();
        if seps.is_empty() {
            return (f64::NAN, f64::NAN);
        }
        let mean = seps.iter().sum::<f64>() / seps.len() as f64;
        let max = seps.iter().copied().fold(0.0, f64::max);
        (mean, max)
    };

    let checkpoints = checkpoint_rows(n)
        .into_iter()
        .map(|index| {
            let (mean_separation, max_separation) = separation_at(index);
            EnsembleCheckpoint {
                index,
                t: reference.t()[index],
                mean_separation,
                max_separation,
            }
        })
        .collect();

    let non_finite_members = runs.iter().filter(|run| !run.is_finite()).count();
    if non_finite_members > 0 {
        warn!(non_finite_members, "ensemble members diverged to non-finite values");
    }

    let divergence_time = (0..n)
        .find(|&i| separation_at(i).0 > DIVERGENCE_THRESHOLD)
        .map(|i| reference.t()[i]);

    Ok(EnsembleResult {
        members,
        spread,
        seed,
        reference_final: final_state(&reference),
        checkpoints,
        divergence_time,
        non_finite_members,
    })
}

/// Two schemes evolved from the same configuration.
#[derive(Debug, Clone)]
pub struct OrderComparison {
    pub a: IntegrationOrder,
    pub b: IntegrationOrder,
    pub first_step_separation: Option<f64>,
    pub max_separation: f64,
    /// First row where the two runs are more than `DIVERGENCE_THRESHOLD` apart.
    pub divergence_index: Option<usize>,
    pub divergence_time: Option<f64>,
}

/// Evolve `base` with orders `a` and `b` (in parallel) and measure where they part ways.
pub fn compare_orders(base: &SimConfig, a: IntegrationOrder, b: IntegrationOrder) -> Result<OrderComparison, AppError> {
    let evolver = Evolver::new(base.params, base.grid)?;
    let (run_a, run_b) = rayon::join(
        || evolver.evolve(base.initial, a),
        || evolver.evolve(base.initial, b),
    );

    let seps: Vec<f64> = run_a
        .states()
        .iter()
        .zip(run_b.states())
        .map(|(sa, sb)| separation(sa, sb))
        .collect();

    // A NaN separation means exactly one run has left the finite range.
    let divergence_index = seps
        .iter()
        .position(|&d| d > DIVERGENCE_THRESHOLD || d.is_nan());

    Ok(OrderComparison {
        a,
        b,
        first_step_separation: seps.get(1).copied(),
        max_separation: seps.iter().copied().filter(|d| d.is_finite()).fold(0.0, f64::max),
        divergence_index,
        divergence_time: divergence_index.map(|i| run_a.t()[i]),
    })
}

/// Distance between two states of paired runs.
///
/// Bit-identical states are zero apart even when non-finite; if exactly one
/// state is non-finite the result is NaN; two distinct non-finite states are
/// infinitely far apart.
fn separation(a: &State, b: &State) -> f64 {
    if a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits()) {
        return 0.0;
    }
    let (fa, fb) = (is_finite_state(a), is_finite_state(b));
    match (fa, fb) {
        (true, true) => (a - b).norm(),
        (false, false) => f64::INFINITY,
        _ => f64::NAN,
    }
}

fn is_finite_state(s: &State) -> bool {
    s.iter().all(|v| v.is_finite())
}

fn final_state(traj: &Trajectory) -> State {
    traj.last().map(|(_, s)| s).unwrap_or_else(State::zeros)
}

/// Evenly spaced row indices including the first and last row.
fn checkpoint_rows(n: usize) -> Vec<usize> {
    if n <= CHECKPOINTS {
        return (0..n).collect();
    }
    let mut rows: Vec<usize> = (0..CHECKPOINTS)
        .map(|k| k * (n - 1) / (CHECKPOINTS - 1))
        .collect();
    rows.dedup();
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeGrid;
    use crate::error::ErrorKind;

    fn short_config(points: usize, end: f64) -> SimConfig {
        SimConfig {
            grid: TimeGrid::new(0.0, end, points).unwrap(),
            ..SimConfig::default()
        }
    }

    #[test]
    fn sweep_preserves_input_order_and_values() {
        let base = short_config(400, 4.0);
        let values = [0.5, 10.0, 28.0, 99.0];
        let runs = sweep(&base, SweepParam::Rho, &values).unwrap();
        assert_eq!(runs.len(), 4);
        for (run, &v) in runs.iter().zip(&values) {
            assert_eq!(run.value, v);
            assert_eq!(run.config.params.rho, v);
            assert_eq!(run.config.params.sigma, base.params.sigma);
        }
    }

    #[test]
    fn sweep_matches_sequential_runs() {
        let base = short_config(300, 3.0);
        let runs = sweep(&base, SweepParam::Sigma, &[5.0, 10.0]).unwrap();
        for run in &runs {
            let expected = evolve_config(&run.config).unwrap();
            assert_eq!(Some(run.final_state), expected.last().map(|(_, s)| s));
        }
    }

    #[test]
    fn sub_critical_rho_decays_towards_origin() {
        let base = SimConfig {
            initial: State::new(1.0, 1.0, 1.0),
            ..short_config(4_000, 40.0)
        };
        let runs = sweep(&base, SweepParam::Rho, &[0.5]).unwrap();
        assert!(runs[0].final_state.norm() < 1e-3);
    }

    #[test]
    fn sweep_rejects_bad_input() {
        let base = short_config(10, 1.0);
        assert_eq!(sweep(&base, SweepParam::Beta, &[]).unwrap_err().kind(), ErrorKind::Config);
        assert_eq!(
            sweep(&base, SweepParam::Beta, &[1.0, f64::NAN]).unwrap_err().kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn ensemble_is_deterministic_for_a_seed() {
        let base = short_config(1_000, 10.0);
        let a = ensemble(&base, 8, 1e-6, 7).unwrap();
        let b = ensemble(&base, 8, 1e-6, 7).unwrap();
        assert_eq!(a.checkpoints, b.checkpoints);
        assert_eq!(a.divergence_time, b.divergence_time);

        let c = ensemble(&base, 8, 1e-6, 8).unwrap();
        assert_ne!(a.checkpoints, c.checkpoints);
    }

    #[test]
    fn ensemble_starts_close_and_spreads_out() {
        let base = short_config(5_000, 40.0);
        let result = ensemble(&base, 6, 1e-8, 42).unwrap();
        let first = result.checkpoints.first().unwrap();
        let last = result.checkpoints.last().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(last.index, 4_999);
        assert!(first.mean_separation < 1e-6);
        assert!(last.mean_separation > first.mean_separation);
        assert!(result.divergence_time.is_some());
    }

    #[test]
    fn ensemble_rejects_bad_input() {
        let base = short_config(10, 1.0);
        assert!(ensemble(&base, 0, 1e-3, 1).is_err());
        assert!(ensemble(&base, 4, 0.0, 1).is_err());
        assert!(ensemble(&base, 4, f64::INFINITY, 1).is_err());
    }

    #[test]
    fn forward_and_rk4_part_ways() {
        let cmp = compare_orders(&SimConfig::default(), IntegrationOrder::Forward, IntegrationOrder::Rk4).unwrap();
        let first = cmp.first_step_separation.unwrap();
        assert!(first > 0.0 && first < 1e-2);
        assert!(cmp.divergence_index.is_some());
        assert!(cmp.max_separation > DIVERGENCE_THRESHOLD);
    }

    #[test]
    fn same_order_never_diverges() {
        let base = short_config(500, 5.0);
        let cmp = compare_orders(&base, IntegrationOrder::Rk4, IntegrationOrder::Rk4).unwrap();
        assert_eq!(cmp.max_separation, 0.0);
        assert_eq!(cmp.divergence_index, None);
    }

    #[test]
    fn same_order_blow_up_is_not_divergence() {
        // dt = 10 makes forward Euler leave the finite range within a few rows.
        let base = SimConfig {
            initial: State::new(1.0, 1.0, 1.0),
            ..short_config(100, 1000.0)
        };
        let cmp = compare_orders(&base, IntegrationOrder::Forward, IntegrationOrder::Forward).unwrap();
        assert_eq!(cmp.max_separation, 0.0);
        assert_eq!(cmp.divergence_index, None);
        assert_eq!(cmp.divergence_time, None);
    }

    #[test]
    fn one_sided_blow_up_counts_as_divergence() {
        let finite = State::new(1.0, 2.0, 3.0);
        let blown = State::new(f64::NAN, 2.0, 3.0);
        assert!(separation(&finite, &blown).is_nan());
        assert!(separation(&blown, &finite).is_nan());
        assert_eq!(separation(&blown, &blown), 0.0);
        assert!((separation(&finite, &State::new(1.0, 2.0, 5.0)) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ensemble_counts_non_finite_members() {
        let base = SimConfig {
            initial: State::new(1.0, 1.0, 1.0),
            order: IntegrationOrder::Forward,
            ..short_config(100, 1000.0)
        };
        let result = ensemble(&base, 4, 1e-6, 3).unwrap();
        assert_eq!(result.non_finite_members, 4);

        let calm = ensemble(&short_config(100, 1.0), 4, 1e-6, 3).unwrap();
        assert_eq!(calm.non_finite_members, 0);
    }

    #[test]
    fn checkpoint_rows_cover_both_ends() {
        assert_eq!(checkpoint_rows(3), vec![0, 1, 2]);
        let rows = checkpoint_rows(1_000);
        assert_eq!(rows.len(), CHECKPOINTS);
        assert_eq!(rows[0], 0);
        assert_eq!(*rows.last().unwrap(), 999);
    }
}
