//! Tracing subscriber setup.
//!
//! Log output goes to stderr so it never mixes with reports, plots or CSV on
//! stdout. The filter comes from `LORENZ_LOG` (standard `EnvFilter` syntax,
//! e.g. `LORENZ_LOG=debug`), falling back to the caller's default.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "LORENZ_LOG";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(default_directive: &str) {
    if INITIALISED.set(()).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    // Another subscriber may already be installed (e.g. by a test harness).
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}
