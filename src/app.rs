//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - runs simulations, sweeps and ensembles
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, CompareArgs, EnsembleArgs, PlotArgs, RunArgs, SimArgs, SweepArgs, sim_config_from_args};
use crate::domain::IntegrationOrder;
use crate::error::AppError;
use crate::io::{resolve_export_path, write_config_json};
use crate::logging::init_logging;
use crate::plot::{render_all_views, render_ascii_view};

pub mod pipeline;

/// Entry point for the `lorenz` binary.
pub fn run() -> Result<(), AppError> {
    // We want `lorenz` and `lorenz --rho 20` to behave like `lorenz tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    dotenvy::dotenv().ok();
    let is_tui = matches!(cli.command, Command::Tui(_));
    // Log lines would tear the alternate screen.
    init_logging(if is_tui { "off" } else { "warn" });

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sweep(args) => handle_sweep(args),
        Command::Ensemble(args) => handle_ensemble(args),
        Command::Compare(args) => handle_compare(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = sim_config_from_args(&args.sim)?;
    let run = pipeline::run_simulation(&config)?;

    println!("{}", crate::report::format_run_summary(&run.config, &run.trajectory));

    if args.plot {
        let plot = match args.view {
            Some(view) => render_ascii_view(&run.trajectory, view, args.width, args.height),
            None => render_all_views(&run.trajectory, args.width, args.height),
        };
        println!("{plot}");
    }

    // Optional exports.
    if args.export.is_some() || args.save {
        let path = resolve_export_path(args.export.as_deref());
        pipeline::export_run(&run, &path)?;
        println!("Wrote {} rows to {}", run.trajectory.len(), path.display());
    }
    if let Some(path) = &args.save_config {
        write_config_json(path, &run.config)?;
        println!("Wrote config to {}", path.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let config = sim_config_from_args(&args.sim)?;
    let run = pipeline::run_simulation(&config)?;

    let plot = match args.view {
        Some(view) => render_ascii_view(&run.trajectory, view, args.width, args.height),
        None => render_all_views(&run.trajectory, args.width, args.height),
    };
    println!("{plot}");
    Ok(())
}

fn handle_sweep(args: SweepArgs) -> Result<(), AppError> {
    let config = sim_config_from_args(&args.sim)?;
    let runs = crate::integrate::sweep(&config, args.param, &args.values)?;
    println!("{}", crate::report::format_sweep_table(args.param, &runs));
    Ok(())
}

fn handle_ensemble(args: EnsembleArgs) -> Result<(), AppError> {
    let config = sim_config_from_args(&args.sim)?;
    let result = crate::integrate::ensemble(&config, args.members, args.spread, args.seed)?;
    println!("{}", crate::report::format_ensemble_report(&result));
    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let config = sim_config_from_args(&args.sim)?;
    let a = IntegrationOrder::from_order(args.a)?;
    let b = IntegrationOrder::from_order(args.b)?;
    let cmp = crate::integrate::compare_orders(&config, a, b)?;
    println!("{}", crate::report::format_order_comparison(&cmp));
    Ok(())
}

fn handle_tui(args: SimArgs) -> Result<(), AppError> {
    let config = sim_config_from_args(&args)?;
    crate::tui::run(config)
}

/// Rewrite argv so `lorenz` defaults to `lorenz tui`.
///
/// Rules:
/// - `lorenz`                      -> `lorenz tui`
/// - `lorenz --rho 20 ...`         -> `lorenz tui --rho 20 ...`
/// - `lorenz --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "run" | "plot" | "sweep" | "ensemble" | "compare" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
