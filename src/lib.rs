#![warn(missing_docs)]
//! Command dispatch with a guaranteed exit-code boundary.
//!
//! A [`Dispatcher`] takes an [`ArgumentWindow`], selects a [`Handler`] from a
//! [`Registry`], runs it, and maps whatever happens onto a stable exit code.
//! Handler errors are reported as `error: ...`; panics are contained and
//! reported as internal errors with exit code 70.

/// Built-in command handlers.
mod commands;
/// Configuration loading and validation.
mod config;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Fault-containment boundary and command dispatch.
mod dispatch;
/// Error handling for the crate.
mod error;
/// Structured data formats for the data commands.
mod format;
/// Handler trait and invocation context.
mod handler;
/// Diagnostic logging setup.
mod logging;
/// Outcomes and the exit-code table.
mod outcome;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Command registration and lookup.
mod registry;
/// Argument window over the process arguments.
mod window;

/// Shared helpers for unit tests.
#[cfg(test)]
mod testutil;

use std::io;

pub use crate::{
    commands::{ColorChoice, builtin_registry},
    config::Config,
    dispatch::{Dispatcher, Phase},
    error::{Error, Result},
    handler::{Context, FnHandler, Handler, parse_params},
    outcome::{FailureCode, INTERNAL_FAULT, Outcome, SUCCESS},
    registry::{CasePolicy, Registry, Resolved},
    window::{ARG_OFFSET, ArgumentWindow, slice},
};

/// Run the CLI over an argument window, returning the process exit code.
///
/// Setup failures (a broken config file, an alias that names no command) are
/// reported the same way as handler failures.
pub fn run(window: ArgumentWindow) -> u8 {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            logging::init(None);
            return report_setup_error(&error, ColorChoice::Auto.enabled_on_stderr());
        }
    };
    logging::init(config.log());

    let registry = match builtin_registry(&config) {
        Ok(registry) => registry,
        Err(error) => return report_setup_error(&error, config.color().enabled_on_stderr()),
    };

    Dispatcher::new(&registry, &config, window)
        .with_color(config.color().enabled())
        .with_error_color(config.color().enabled_on_stderr())
        .resolve_exit_code()
}

/// Report an error raised before dispatch and return its exit code.
fn report_setup_error(error: &Error, err_color: bool) -> u8 {
    let outcome = Outcome::failure(error.exit_code(), error.to_string());
    let stderr = io::stderr();
    outcome.report(&mut stderr.lock(), err_color);
    outcome.exit_code()
}
