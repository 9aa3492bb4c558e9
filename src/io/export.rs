//! Export a trajectory to CSV.
//!
//! The layout is a plain table, easy to load in spreadsheets or dataframes:
//!
//! ```text
//! ,t,x,y,z
//! 0,0,0.1,0,0
//! ...
//! ```
//!
//! The unnamed first column is the row index. Values use Rust's shortest
//! round-trip formatting, so reading the file back reproduces every `f64`
//! exactly (including `NaN` and `inf`).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::Trajectory;
use crate::error::AppError;

/// Export destination used when none is configured.
pub const DEFAULT_EXPORT_PATH: &str = "export.csv";

/// Environment variable overriding the export destination.
pub const EXPORT_PATH_ENV: &str = "LORENZ_EXPORT";

/// Resolve the export path: explicit path, then `LORENZ_EXPORT` (from the
/// environment or `.env`), then `export.csv`.
pub fn resolve_export_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    dotenvy::dotenv().ok();
    export_path_from_env(std::env::var(EXPORT_PATH_ENV).ok().as_deref())
}

/// Blank values fall back to `DEFAULT_EXPORT_PATH`.
fn export_path_from_env(value: Option<&str>) -> PathBuf {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => PathBuf::from(raw),
        _ => PathBuf::from(DEFAULT_EXPORT_PATH),
    }
}

/// Write the trajectory to a CSV file at `path`.
pub fn write_trajectory_csv(path: &Path, trajectory: &Trajectory) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    write_trajectory(&mut out, trajectory)
        .map_err(|e| AppError::io(format!("Failed to write export CSV '{}': {e}", path.display())))?;
    out.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV '{}': {e}", path.display())))?;

    info!(path = %path.display(), rows = trajectory.len(), "exported trajectory");
    Ok(())
}

/// Write the CSV table to any writer.
pub fn write_trajectory<W: Write>(out: &mut W, trajectory: &Trajectory) -> std::io::Result<()> {
    writeln!(out, ",t,x,y,z")?;
    for (i, (t, s)) in trajectory.t().iter().zip(trajectory.states()).enumerate() {
        writeln!(out, "{i},{t},{},{},{}", s.x, s.y, s.z)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SimConfig, State, TimeGrid};
    use crate::error::ErrorKind;
    use crate::integrate::evolve_config;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lorenz_{}_{name}", std::process::id()))
    }

    #[test]
    fn table_has_header_index_and_one_row_per_sample() {
        let traj = Trajectory::from_parts(
            vec![0.0, 0.5],
            vec![State::new(0.1, 0.0, 0.0), State::new(-1.5, 2.25, 1e-20)],
        );
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, ",t,x,y,z\n0,0,0.1,0,0\n1,0.5,-1.5,2.25,0.00000000000000000001\n");
    }

    #[test]
    fn non_finite_values_are_written_as_is() {
        let traj = Trajectory::from_parts(
            vec![0.0],
            vec![State::new(f64::NAN, f64::INFINITY, f64::NEG_INFINITY)],
        );
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), ",t,x,y,z\n0,0,NaN,inf,-inf\n");
    }

    #[test]
    fn exported_values_round_trip_exactly() {
        let config = SimConfig {
            grid: TimeGrid::new(0.0, 2.0, 250).unwrap(),
            ..SimConfig::default()
        };
        let traj = evolve_config(&config).unwrap();
        let path = temp_path("roundtrip.csv");
        write_trajectory_csv(&path, &traj).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 251);
        assert_eq!(rows[0], ",t,x,y,z");

        for (i, line) in rows[1..].iter().enumerate() {
            let cols: Vec<&str> = line.split(',').collect();
            assert_eq!(cols[0].parse::<usize>().unwrap(), i);
            let (t, s) = traj.row(i).unwrap();
            assert_eq!(cols[1].parse::<f64>().unwrap(), t);
            assert_eq!(cols[2].parse::<f64>().unwrap(), s.x);
            assert_eq!(cols[3].parse::<f64>().unwrap(), s.y);
            assert_eq!(cols[4].parse::<f64>().unwrap(), s.z);
        }
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let traj = Trajectory::from_parts(vec![0.0], vec![State::zeros()]);
        let path = temp_path("missing_dir").join("nested").join("export.csv");
        let err = write_trajectory_csv(&path, &traj).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.message().contains("export.csv"));
    }

    #[test]
    fn explicit_export_path_wins() {
        let explicit = PathBuf::from("out/run.csv");
        assert_eq!(resolve_export_path(Some(&explicit)), explicit);
    }

    #[test]
    fn env_value_selects_the_destination() {
        assert_eq!(export_path_from_env(None), PathBuf::from(DEFAULT_EXPORT_PATH));
        assert_eq!(export_path_from_env(Some("")), PathBuf::from("export.csv"));
        assert_eq!(export_path_from_env(Some("  \t")), PathBuf::from("export.csv"));
        assert_eq!(export_path_from_env(Some(" runs/a.csv ")), PathBuf::from("runs/a.csv"));
    }

    #[test]
    fn export_path_follows_the_environment() {
        // Only this test touches the variable, so set/unset stay in one place.
        // SAFETY: no other test reads or writes LORENZ_EXPORT.
        unsafe { std::env::set_var(EXPORT_PATH_ENV, "runs/from_env.csv") };
        let from_env = resolve_export_path(None);
        unsafe { std::env::set_var(EXPORT_PATH_ENV, "   ") };
        let blank = resolve_export_path(None);
        unsafe { std::env::remove_var(EXPORT_PATH_ENV) };
        let unset = resolve_export_path(None);

        assert_eq!(from_env, PathBuf::from("runs/from_env.csv"));
        assert_eq!(blank, PathBuf::from(DEFAULT_EXPORT_PATH));
        assert_eq!(unset, PathBuf::from(DEFAULT_EXPORT_PATH));

        let explicit = PathBuf::from("out/run.csv");
        assert_eq!(resolve_export_path(Some(&explicit)), explicit);
    }
}
