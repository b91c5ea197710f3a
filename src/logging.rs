//! Tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;

/// Installs a stderr fmt subscriber filtered by `GITVERSION_LOG`.
///
/// Without the variable the level is `warn`, or `debug` when `verbose`.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
