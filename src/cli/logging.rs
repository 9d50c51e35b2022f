//! Structured logging setup
//!
//! Logs go to stderr so stdout stays free for command output. `RUST_LOG`
//! wins when set; otherwise only warnings are shown, or debug output for
//! this crate with `--verbose`.

use tracing_subscriber::prelude::*;

/// Default filter without `--verbose`
const DEFAULT_FILTER: &str = "warn";

/// Filter used with `--verbose`
const VERBOSE_FILTER: &str = "warn,audio_capture=debug";

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();

    tracing::debug!("Logging initialized");
}
