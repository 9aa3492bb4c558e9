//! Text reports.

use crate::domain::{AxisRange, SimConfig, State, Trajectory};
use crate::dynamics::fixed_points;
use crate::integrate::{DIVERGENCE_THRESHOLD, EnsembleResult, OrderComparison, SweepParam, SweepRun};

/// Format the full run summary (configuration + trajectory diagnostics).
pub fn format_run_summary(config: &SimConfig, trajectory: &Trajectory) -> String {
    let mut out = String::new();
    let p = &config.params;
    let g = &config.grid;

    out.push_str("=== lorenz - Lorenz attractor integration ===\n");
    out.push_str(&format!(
        "Params: sigma={} beta={:.6} rho={}\n",
        p.sigma, p.beta, p.rho
    ));
    out.push_str(&format!(
        "Grid: n={} | t=[{}, {}] | dt={}\n",
        g.points,
        g.start,
        g.end,
        g.dt()
    ));
    out.push_str(&format!(
        "Scheme: {} (order {}, {} derivative evals/step)\n",
        config.order.display_name(),
        config.order.order(),
        config.order.evaluations_per_step()
    ));

    out.push_str("\nTrajectory:\n");
    out.push_str(&format!("- rows : {}\n", trajectory.len()));
    if let Some((t, s)) = trajectory.first() {
        out.push_str(&format!("- first: t={t:.4} {}\n", fmt_state(&s)));
    }
    if let Some((t, s)) = trajectory.last() {
        out.push_str(&format!("- last : t={t:.4} {}\n", fmt_state(&s)));
    }
    let [x, y, z] = trajectory.ranges();
    out.push_str(&format!(
        "- range: x={} y={} z={}\n",
        fmt_range(x),
        fmt_range(y),
        fmt_range(z)
    ));
    if let Some(idx) = trajectory.first_non_finite() {
        let t = trajectory.t()[idx];
        out.push_str(&format!(
            "- note : non-finite values from row {idx} (t={t:.4}); step size may be too large\n"
        ));
    }

    out.push_str("\nFixed points:\n");
    for fp in fixed_points(p) {
        out.push_str(&format!("- {}\n", fmt_state(&fp)));
    }

    out
}

/// Format a parameter sweep as a table (one row per run).
pub fn format_sweep_table(param: SweepParam, runs: &[SweepRun]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>10} {:>12} {:>12} {:>12} {:>18} {:>18}\n",
            param.symbol(),
            "x_final",
            "y_final",
            "z_final",
            "x_range",
            "z_range"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<10} {:-<12} {:-<12} {:-<12} {:-<18} {:-<18}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for run in runs {
        let s = run.final_state;
        let mut row = format!(
            "{:>10.4} {:>12.4} {:>12.4} {:>12.4} {:>18} {:>18}",
            run.value,
            s.x,
            s.y,
            s.z,
            fmt_range(run.ranges[0]),
            fmt_range(run.ranges[2]),
        );
        if let Some(idx) = run.first_non_finite {
            row.push_str(&format!("  (non-finite from row {idx})"));
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

/// Format an ensemble divergence report.
pub fn format_ensemble_report(result: &EnsembleResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Ensemble: members={} spread={:e} seed={}\n",
        result.members, result.spread, result.seed
    ));
    out.push_str(&format!(
        "Reference final state: {}\n\n",
        fmt_state(&result.reference_final)
    ));

    out.push_str(&format!("{:>8} {:>10} {:>14} {:>14}\n", "row", "t", "mean_sep", "max_sep"));
    out.push_str(&format!("{:-<8} {:-<10} {:-<14} {:-<14}\n", "", "", "", ""));
    for c in &result.checkpoints {
        out.push_str(&format!(
            "{:>8} {:>10.3} {:>14.6e} {:>14.6e}\n",
            c.index, c.t, c.mean_separation, c.max_separation
        ));
    }

    out.push('\n');
    match result.divergence_time {
        Some(t) => out.push_str(&format!(
            "Mean separation exceeds {DIVERGENCE_THRESHOLD} at t={t:.3}\n"
        )),
        None if result.non_finite_members > 0 => out.push_str(&format!(
            "Mean separation stays below {DIVERGENCE_THRESHOLD} among finite members\n"
        )),
        None => out.push_str(&format!(
            "Mean separation stays below {DIVERGENCE_THRESHOLD} over the whole grid\n"
        )),
    }
    if result.non_finite_members > 0 {
        out.push_str(&format!(
            "Note: {} of {} members reached non-finite values; step size may be too large\n",
            result.non_finite_members, result.members
        ));
    }

    out
}

/// Format a two-scheme comparison.
pub fn format_order_comparison(cmp: &OrderComparison) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Comparing {} (order {}) vs {} (order {})\n",
        cmp.a.display_name(),
        cmp.a.order(),
        cmp.b.display_name(),
        cmp.b.order()
    ));
    match cmp.first_step_separation {
        Some(d) => out.push_str(&format!("- separation after one step: {d:.6e}\n")),
        None => out.push_str("- separation after one step: - (single-point grid)\n"),
    }
    out.push_str(&format!("- max finite separation: {:.6}\n", cmp.max_separation));
    match (cmp.divergence_index, cmp.divergence_time) {
        (Some(i), Some(t)) => out.push_str(&format!(
            "- separation exceeds {DIVERGENCE_THRESHOLD} at row {i} (t={t:.3})\n"
        )),
        _ => out.push_str(&format!(
            "- separation stays below {DIVERGENCE_THRESHOLD} over the whole grid\n"
        )),
    }
    out
}

fn fmt_state(s: &State) -> String {
    format!("({:.6}, {:.6}, {:.6})", s.x, s.y, s.z)
}

fn fmt_range(r: Option<AxisRange>) -> String {
    match r {
        Some(r) => format!("[{:.2}, {:.2}]", r.min, r.max),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IntegrationOrder, TimeGrid};
    use crate::integrate::{EnsembleCheckpoint, evolve_config};

    #[test]
    fn run_summary_lists_config_and_endpoints() {
        let config = SimConfig {
            grid: TimeGrid::new(0.0, 1.0, 100).unwrap(),
            order: IntegrationOrder::Midpoint,
            ..SimConfig::default()
        };
        let traj = evolve_config(&config).unwrap();
        let txt = format_run_summary(&config, &traj);
        assert!(txt.contains("Params: sigma=10 beta=2.666667 rho=28\n"));
        assert!(txt.contains("Grid: n=100 | t=[0, 1] | dt=0.01\n"));
        assert!(txt.contains("Scheme: Midpoint (RK2) (order 2, 2 derivative evals/step)\n"));
        assert!(txt.contains("- rows : 100\n"));
        assert!(txt.contains("- first: t=0.0000 (0.100000, 0.000000, 0.000000)\n"));
        assert!(!txt.contains("non-finite"));
        assert_eq!(txt.matches("\n- (").count(), 3);
    }

    #[test]
    fn run_summary_flags_divergence() {
        let traj = Trajectory::from_parts(
            vec![0.0, 1.0],
            vec![State::new(1.0, 1.0, 1.0), State::new(f64::INFINITY, 0.0, 0.0)],
        );
        let txt = format_run_summary(&SimConfig::default(), &traj);
        assert!(txt.contains("non-finite values from row 1 (t=1.0000)"));
    }

    #[test]
    fn sweep_table_has_one_row_per_run() {
        let run = SweepRun {
            value: 28.0,
            config: SimConfig::default(),
            final_state: State::new(1.0, 2.0, 3.0),
            ranges: [
                Some(AxisRange { min: -1.0, max: 1.0 }),
                None,
                Some(AxisRange { min: 0.0, max: 40.0 }),
            ],
            first_non_finite: None,
        };
        let txt = format_sweep_table(SweepParam::Rho, &[run.clone(), run]);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_start().starts_with("rho"));
        assert_eq!(
            lines[2],
            "   28.0000       1.0000       2.0000       3.0000      [-1.00, 1.00]      [0.00, 40.00]"
        );
    }

    #[test]
    fn ensemble_report_mentions_divergence() {
        let result = EnsembleResult {
            members: 4,
            spread: 1e-6,
            seed: 1,
            reference_final: State::zeros(),
            checkpoints: vec![EnsembleCheckpoint { index: 0, t: 0.0, mean_separation: 1e-6, max_separation: 2e-6 }],
            divergence_time: Some(12.5),
            non_finite_members: 0,
        };
        let txt = format_ensemble_report(&result);
        assert!(txt.contains("members=4 spread=1e-6 seed=1"));
        assert!(txt.contains("at t=12.500"));
        assert!(!txt.contains("non-finite"));
    }

    #[test]
    fn ensemble_report_flags_non_finite_members() {
        let result = EnsembleResult {
            members: 4,
            spread: 1e-6,
            seed: 1,
            reference_final: State::new(f64::NAN, f64::NAN, f64::NAN),
            checkpoints: vec![EnsembleCheckpoint {
                index: 10,
                t: 100.0,
                mean_separation: f64::NAN,
                max_separation: f64::NAN,
            }],
            divergence_time: None,
            non_finite_members: 3,
        };
        let txt = format_ensemble_report(&result);
        assert!(!txt.contains("over the whole grid"));
        assert!(txt.contains("stays below 1 among finite members\n"));
        assert!(txt.contains("Note: 3 of 4 members reached non-finite values"));
    }

    #[test]
    fn order_comparison_handles_no_divergence() {
        let cmp = OrderComparison {
            a: IntegrationOrder::Rk4,
            b: IntegrationOrder::Rk4,
            first_step_separation: None,
            max_separation: 0.0,
            divergence_index: None,
            divergence_time: None,
        };
        let txt = format_order_comparison(&cmp);
        assert!(txt.contains("single-point grid"));
        assert!(txt.contains("stays below"));
    }
}
