//! Logging setup for the command-line tool.
//!
//! Log events go to stderr so they never mix with the summary on stdout.
//!
//! Priority: `RUST_LOG` > `--verbose` (debug) > default `warn`.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor `--verbose` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Installs the global tracing subscriber.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialised");
    }
}
