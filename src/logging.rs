//! Diagnostics on stderr via tracing-subscriber
//!
//! `RUST_LOG` wins when set (e.g. `RUST_LOG=mstudy=trace`); otherwise the
//! level follows the global `--verbose` / `--quiet` flags.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive for the given verbosity flags
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .try_init();
}
