//! Logging for the launcher.
//!
//! The launcher has no user-facing message channel; its exit code is the
//! diagnostic signal. Logging is off unless `PSLAUNCH_LOG` holds an
//! `EnvFilter` directive, in which case events go to stderr.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "PSLAUNCH_LOG";

/// Filter used when `PSLAUNCH_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "off";

/// Build the filter from a directive, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the tracing subscriber.
///
/// Returns `false` if a global subscriber was already installed; a second
/// call is harmless.
pub fn init_tracing() -> bool {
    let directive = std::env::var(LOG_ENV).ok();
    let env_filter = filter_from(directive.as_deref());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}
