//! Configuration loading and validation.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    commands::ColorChoice,
    error::{Error, Result},
    paths,
};

/// Parsed configuration for the CLI.
///
/// A missing config file is not an error: every field has a default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path the config was loaded from, when known.
    path: Option<PathBuf>,
    /// Whether a config file existed at `path`.
    loaded: bool,
    /// Command run when no command token is given.
    default_command: Option<String>,
    /// Color output selection.
    color: ColorChoice,
    /// Log filter directive.
    log: Option<String>,
    /// Alias name mapped to its expansion tokens.
    aliases: BTreeMap<String, Vec<String>>,
}

/// Raw config file structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// Command run when no command token is given.
    default_command: Option<String>,
    /// Color output selection.
    color: Option<ColorChoice>,
    /// Log filter directive.
    log: Option<String>,
    /// Alias name mapped to a shell-quoted expansion.
    aliases: Option<BTreeMap<String, String>>,
}

impl Config {
    /// Load the config from the default location or `CMDGATE_CONFIG`.
    pub fn load() -> Result<Self> {
        let path = paths::config_path()?;
        Self::load_from(&path)
    }

    /// Load a config file from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self {
                    path: Some(path.to_path_buf()),
                    ..Self::default()
                });
            }
            Err(error) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        let mut config = Self::parse(&contents, path)?;
        config.path = Some(path.to_path_buf());
        config.loaded = true;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse config contents. `path` is only used for error messages.
    fn parse(contents: &str, path: &Path) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents).map_err(|error| Error::ConfigParse {
            path: path.to_path_buf(),
            source: error,
        })?;

        let default_command = raw
            .default_command
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let mut aliases = BTreeMap::new();
        for (name, expansion) in raw.aliases.unwrap_or_default() {
            let tokens = shell_words::split(&expansion).map_err(|error| Error::InvalidAlias {
                name: name.clone(),
                message: error.to_string(),
            })?;
            if tokens.is_empty() {
                return Err(Error::InvalidAlias {
                    name,
                    message: "expansion is empty".to_string(),
                });
            }
            aliases.insert(name, tokens);
        }

        Ok(Self {
            path: None,
            loaded: false,
            default_command,
            color: raw.color.unwrap_or_default(),
            log: raw.log,
            aliases,
        })
    }

    /// Return the config path, if one was resolved.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether a config file was found and read.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Return the configured default command.
    pub fn default_command(&self) -> Option<&str> {
        self.default_command.as_deref()
    }

    /// Return the configured color selection.
    pub fn color(&self) -> ColorChoice {
        self.color
    }

    /// Return the configured log filter.
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    /// Return configured aliases.
    pub fn aliases(&self) -> &BTreeMap<String, Vec<String>> {
        &self.aliases
    }
}
