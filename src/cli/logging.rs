//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--verbose` flag (debug for this crate)
//! 2. `TASKRANK_LOG` environment variable (e.g. "info", "taskrank=trace")
//! 3. default to `warn`
//!
//! Logs go to STDERR so that stdout stays parseable in `--format json` mode.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = build_filter(verbose, std::env::var("TASKRANK_LOG").ok().as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

fn build_filter(verbose: bool, env: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("taskrank=debug");
    }

    env.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
