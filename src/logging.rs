//! Diagnostic logging setup.
//!
//! Logs go to stderr and are off except for warnings unless `CMDGATE_LOG` or
//! the config `log` key asks for more.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "CMDGATE_LOG";

/// Directive used when neither the environment nor config names one.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber.
///
/// `CMDGATE_LOG` wins over `configured`. Calling this more than once is
/// harmless: later calls leave the first subscriber in place.
pub fn init(configured: Option<&str>) {
    let (filter, rejected) = build_filter(configured);
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
    if let Err(error) = installed {
        tracing::debug!(%error, "log subscriber already installed");
    }
    if let Some(directive) = rejected {
        tracing::warn!(%directive, "ignoring invalid log directive");
    }
}

/// Choose a filter, returning the rejected directive when one was invalid.
fn build_filter(configured: Option<&str>) -> (EnvFilter, Option<String>) {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return (filter, None);
    }
    match configured {
        Some(directive) => match EnvFilter::try_new(directive) {
            Ok(filter) => (filter, None),
            Err(_) => (EnvFilter::new(DEFAULT_DIRECTIVE), Some(directive.to_string())),
        },
        None => (EnvFilter::new(DEFAULT_DIRECTIVE), None),
    }
}
