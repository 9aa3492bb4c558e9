//! Read/write simulation config JSON files.
//!
//! A config file describes one run completely:
//!
//! ```json
//! {
//!   "params": { "sigma": 10.0, "beta": 2.6666666666666665, "rho": 28.0 },
//!   "grid": { "start": 0.0, "end": 80.0, "points": 10000 },
//!   "initial": [0.1, 0.0, 0.0],
//!   "order": 4
//! }
//! ```
//!
//! Every field is optional and falls back to its default. The schema is
//! defined by `domain::SimConfig`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::SimConfig;
use crate::error::AppError;

/// Read and validate a config JSON file.
pub fn read_config_json(path: &Path) -> Result<SimConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open config JSON '{}': {e}", path.display())))?;
    let config: SimConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AppError::config(format!("Invalid config JSON '{}': {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Write a config JSON file.
pub fn write_config_json(path: &Path, config: &SimConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create config JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, config)
        .map_err(|e| AppError::io(format!("Failed to write config JSON '{}': {e}", path.display())))?;
    Ok(())
}
