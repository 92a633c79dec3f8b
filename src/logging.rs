//! Diagnostic logging with **tracing**.
//!
//! Logs go to stderr so stdout carries only the report.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or
/// debug output for this crate when `verbose` is set.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "depsweep=debug"
    } else {
        "depsweep=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
