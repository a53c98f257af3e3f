//! Structured data formats understood by `convert` and `validate`.
//!
//! Documents are parsed into a `serde_json::Value`, which serves as the
//! interchange representation between formats.

use std::{fmt, path::Path, result::Result as StdResult};

use clap::ValueEnum;
use serde_json::Value;

use crate::error::{Error, Result};

/// A supported data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Format {
    /// JSON documents.
    Json,
    /// YAML documents.
    Yaml,
    /// TOML documents.
    Toml,
}

impl Format {
    /// Match a file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Infer the format of a path from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().map(|ext| ext.to_string_lossy());
        extension
            .as_deref()
            .and_then(Self::from_extension)
            .ok_or_else(|| Error::UnknownFormat {
                name: extension.map_or_else(
                    || path.display().to_string(),
                    |ext| ext.into_owned(),
                ),
            })
    }

    /// Lowercase name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    /// Parse `text` read from `path`.
    pub fn parse(self, text: &str, path: &Path) -> Result<Value> {
        let parsed = match self {
            Self::Json => serde_json::from_str(text).map_err(|error| error.to_string()),
            Self::Yaml => serde_yaml::from_str(text).map_err(|error| error.to_string()),
            Self::Toml => toml::from_str(text).map_err(|error| error.to_string()),
        };
        parsed.map_err(|message| Error::Parse {
            path: path.to_path_buf(),
            format: self.name().to_string(),
            message: message.trim_end().to_string(),
        })
    }

    /// Render a document, always ending with a newline.
    pub fn render(self, value: &Value) -> Result<String> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(value).map_err(|error| error.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|error| error.to_string()),
            Self::Toml => render_toml(value),
        };
        let mut rendered = rendered.map_err(|message| Error::Serialize {
            format: self.name().to_string(),
            message,
        })?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

/// Render TOML, which needs a table at the top level and has no null.
fn render_toml(value: &Value) -> StdResult<String, String> {
    if !value.is_object() {
        return Err("the top level must be a table".to_string());
    }
    if let Some(path) = find_null(value, String::new()) {
        return Err(format!("null values are not supported (at {path})"));
    }
    toml::to_string(value).map_err(|error| error.to_string())
}

/// Return the dotted path of the first null inside `value`, if any.
fn find_null(value: &Value, path: String) -> Option<String> {
    match value {
        Value::Null => Some(if path.is_empty() { ".".to_string() } else { path }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(index, item)| find_null(item, format!("{path}[{index}]"))),
        Value::Object(map) => map.iter().find_map(|(key, item)| {
            let child = if path.is_empty() {
                key.clone()
            } else {
                format!("{path}.{key}")
            };
            find_null(item, child)
        }),
        _ => None,
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
