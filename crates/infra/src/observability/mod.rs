//! Logging setup
//!
//! Everything in this workspace logs through `tracing`. Call
//! [`init_logging`] once at startup; `RUST_LOG` overrides the default
//! filter for the run mode.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use xanodash_domain::RunMode;

/// Default filter directives for `run_mode`
pub fn default_directives(run_mode: RunMode) -> &'static str {
    match run_mode {
        RunMode::Development => "info,xanodash_infra=debug",
        RunMode::Production => "info",
    }
}

/// Install the global subscriber: human-readable output in development,
/// JSON lines in production.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_logging(run_mode: RunMode) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(run_mode)));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match run_mode {
        RunMode::Development => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
        RunMode::Production => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .try_init(),
    };

    match result {
        Ok(()) => {
            tracing::debug!(run_mode = %run_mode, "Logging initialised");
            true
        }
        Err(_) => false,
    }
}
