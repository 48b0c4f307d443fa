//! Tracing setup for the `pageshot` binary.
//!
//! Logs go to stderr; stdout is reserved for command output such as page
//! listings and run summaries. `RUST_LOG` overrides everything here.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Crates whose events follow the configured level. Everything else is held
/// at `warn`.
const PAGESHOT_TARGETS: &[&str] = &[
    "pageshot",
    "pageshot_common",
    "pageshot_ordering",
    "pageshot_imaging",
    "pageshot_document",
    "pageshot_capture",
];

/// Filter directives for the given level. `verbose` forces `debug`.
pub fn filter_directives(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level.trim() };
    let level = if level.is_empty() { "info" } else { level };

    let mut directives = vec!["warn".to_string()];
    directives.extend(
        PAGESHOT_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}

/// Install the global subscriber. Calling it twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn init_logging(config: &LoggingConfig, verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(filter_directives(&config.level, verbose))
            .unwrap_or_else(|_| EnvFilter::new(filter_directives("info", verbose)))
    });

    let installed = if config.json {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
