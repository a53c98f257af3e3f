//! Built-in command handlers.
//!
//! Each command is an ordinary [`Handler`](crate::handler::Handler); the dispatcher knows nothing
//! about them beyond what [`builtin_registry`] registers.

use std::{
    env,
    io::{self, IsTerminal},
};

use clap::CommandFactory;
use serde::Deserialize;

use crate::{
    config::Config,
    error::Result,
    registry::{CasePolicy, Registry},
};

/// Output color handling selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colorize only when output is a TTY and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled on stdout.
    pub(crate) fn enabled(self) -> bool {
        self.enabled_for(io::stdout().is_terminal())
    }

    /// Determine whether diagnostics written to stderr should be colorized.
    pub(crate) fn enabled_on_stderr(self) -> bool {
        self.enabled_for(io::stderr().is_terminal())
    }

    /// Resolve the choice for a stream with the given terminal status.
    fn enabled_for(self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => env::var_os("NO_COLOR").is_none() && is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }

    /// Name used in config files.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

// Command modules are ordered alphabetically - maintain this order.
/// Config command implementation.
pub mod config;
/// Convert command implementation.
pub mod convert;
/// Help command implementation.
pub mod help;
/// Validate command implementation.
pub mod validate;
/// Version command implementation.
pub mod version;

/// Build the registry of built-in commands, applying config aliases and default.
pub fn builtin_registry(config: &Config) -> Result<Registry> {
    // Registrations are ordered alphabetically - maintain this order.
    let mut registry = Registry::new(CasePolicy::Sensitive)
        .with("config", config::ConfigCommand)?
        .with("convert", convert::Convert)?
        .with("help", help::Help)?
        .with("validate", validate::Validate)?
        .with("version", version::Version)?;

    for flag in ["--help", "-h"] {
        registry.alias(flag, vec!["help".to_string()])?;
    }
    for flag in ["--version", "-V"] {
        registry.alias(flag, vec!["version".to_string()])?;
    }
    for (name, expansion) in config.aliases() {
        registry.alias(name, expansion.clone())?;
    }
    if let Some(name) = config.default_command() {
        registry.set_default(name)?;
    }
    Ok(registry)
}

/// Render clap's help for a handler's parameter struct.
pub(crate) fn clap_help<T: CommandFactory>(name: &str) -> String {
    T::command()
        .bin_name(format!("cmdgate {name}"))
        .render_help()
        .to_string()
}

/// Whether a registry entry is a flag spelling rather than a command name.
pub(crate) fn is_flag_alias(name: &str) -> bool {
    name.starts_with('-')
}
