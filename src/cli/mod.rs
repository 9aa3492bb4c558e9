//! Command-line parsing for the Lorenz integrator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the integration code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{IntegrationOrder, SimConfig, State};
use crate::error::AppError;
use crate::integrate::SweepParam;
use crate::io::read_config_json;
use crate::plot::View;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lorenz", version, about = "Lorenz attractor integrator and viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Integrate once, print a summary, and optionally plot/export.
    Run(RunArgs),
    /// Integrate once and print one view (or all seven) as ASCII plots.
    Plot(PlotArgs),
    /// Run one simulation per parameter value, in parallel.
    Sweep(SweepArgs),
    /// Track how a cloud of perturbed initial states drifts apart.
    Ensemble(EnsembleArgs),
    /// Integrate with two schemes and report where they diverge.
    Compare(CompareArgs),
    /// Launch the interactive TUI.
    Tui(SimArgs),
}

/// Simulation settings shared by every subcommand.
///
/// Flags override values from `--config`, which override the defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct SimArgs {
    /// JSON config file with any of: params, grid, initial, order.
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Prandtl number σ (default 10).
    #[arg(long, allow_negative_numbers = true)]
    pub sigma: Option<f64>,

    /// Geometric factor β (default 8/3).
    #[arg(long, allow_negative_numbers = true)]
    pub beta: Option<f64>,

    /// Rayleigh number ρ (default 28).
    #[arg(long, allow_negative_numbers = true)]
    pub rho: Option<f64>,

    /// Start time (default 0).
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<f64>,

    /// End time (default 80).
    #[arg(long, allow_negative_numbers = true)]
    pub end: Option<f64>,

    /// Number of grid points (default 10000).
    #[arg(short = 'n', long)]
    pub points: Option<usize>,

    /// Initial x (default 0.1).
    #[arg(long, allow_negative_numbers = true)]
    pub x0: Option<f64>,

    /// Initial y (default 0).
    #[arg(long, allow_negative_numbers = true)]
    pub y0: Option<f64>,

    /// Initial z (default 0).
    #[arg(long, allow_negative_numbers = true)]
    pub z0: Option<f64>,

    /// Integration order: 1 (forward Euler), 2 (midpoint), 4 (RK4, default).
    #[arg(short = 'o', long)]
    pub order: Option<u8>,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub sim: SimArgs,

    /// Print an ASCII plot after the summary.
    #[arg(long)]
    pub plot: bool,

    /// View to plot with `--plot` (all seven if omitted).
    #[arg(long, value_enum)]
    pub view: Option<View>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the trajectory to this CSV file.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export to the default location (`LORENZ_EXPORT` or `export.csv`).
    #[arg(long)]
    pub save: bool,

    /// Write the resolved configuration to a JSON file.
    #[arg(long = "save-config", value_name = "JSON")]
    pub save_config: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub sim: SimArgs,

    /// View to plot (all seven if omitted).
    #[arg(long, value_enum)]
    pub view: Option<View>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub sim: SimArgs,

    /// Parameter to vary.
    #[arg(long, value_enum, default_value_t = SweepParam::Rho)]
    pub param: SweepParam,

    /// Comma-separated parameter values, e.g. `10,20,28`.
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

#[derive(Debug, Args, Clone)]
pub struct EnsembleArgs {
    #[command(flatten)]
    pub sim: SimArgs,

    /// Number of perturbed members.
    #[arg(long, default_value_t = 16)]
    pub members: usize,

    /// Standard deviation of the Gaussian perturbation of the initial state.
    #[arg(long, default_value_t = 1e-6)]
    pub spread: f64,

    /// Random seed for the perturbations.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub sim: SimArgs,

    /// First integration order.
    #[arg(long, default_value_t = 1)]
    pub a: u8,

    /// Second integration order.
    #[arg(long, default_value_t = 4)]
    pub b: u8,
}

/// Resolve flags (+ optional config file) into a validated `SimConfig`.
pub fn sim_config_from_args(args: &SimArgs) -> Result<SimConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => read_config_json(path)?,
        None => SimConfig::default(),
    };

    if let Some(v) = args.sigma {
        config.params.sigma = v;
    }
    if let Some(v) = args.beta {
        config.params.beta = v;
    }
    if let Some(v) = args.rho {
        config.params.rho = v;
    }
    if let Some(v) = args.start {
        config.grid.start = v;
    }
    if let Some(v) = args.end {
        config.grid.end = v;
    }
    if let Some(v) = args.points {
        config.grid.points = v;
    }
    let [x, y, z] = [args.x0, args.y0, args.z0];
    config.initial = State::new(
        x.unwrap_or(config.initial.x),
        y.unwrap_or(config.initial.y),
        z.unwrap_or(config.initial.z),
    );
    if let Some(order) = args.order {
        config.order = IntegrationOrder::from_order(order)?;
    }

    config.validate()?;
    Ok(config)
}
