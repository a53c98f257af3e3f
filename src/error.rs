//! Error types for cmdgate.

use std::{env::VarError, io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;
use toml::de::Error as TomlError;

use crate::outcome::FailureCode;

/// Result type for cmdgate operations.
pub type Result<T> = StdResult<T, Error>;

/// Recognized failures. Each one resolves to a handled exit code.
#[derive(Debug, Error)]
pub enum Error {
    /// The window was empty and no default command is configured.
    #[error("No command given. Run `cmdgate help` to list commands.")]
    NoCommand,
    /// The first token did not name a registered command or alias.
    #[error("Unknown command '{name}'. Run `cmdgate help` to list commands.")]
    UnknownCommand {
        /// Token that failed to resolve.
        name: String,
    },
    /// Parameters were missing or malformed.
    #[error("{message}")]
    Usage {
        /// Error message describing the problem.
        message: String,
    },
    /// A command name was registered twice.
    #[error("Command '{name}' is registered more than once.")]
    DuplicateCommand {
        /// Duplicated command name.
        name: String,
    },
    /// The default command does not name a registered command.
    #[error("Default command '{name}' is not a registered command.")]
    UnknownDefault {
        /// Configured default.
        name: String,
    },
    /// An alias definition could not be used.
    #[error("Invalid alias '{name}': {message}")]
    InvalidAlias {
        /// Alias name.
        name: String,
        /// Error message describing the problem.
        message: String,
    },
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A configured path could not be expanded.
    #[error("Invalid config path: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// An input file does not exist.
    #[error("Input does not exist: {path}")]
    InputMissing {
        /// Missing path.
        path: PathBuf,
    },
    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    InputRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Input data could not be parsed in its format.
    #[error("Failed to parse {path} as {format}: {message}")]
    Parse {
        /// Path of the malformed input.
        path: PathBuf,
        /// Format the input was parsed as.
        format: String,
        /// Parser error message.
        message: String,
    },
    /// Data could not be represented in the target format.
    #[error("Cannot write {format}: {message}")]
    Serialize {
        /// Target format.
        format: String,
        /// Serializer error message.
        message: String,
    },
    /// A data format could not be determined or is unsupported.
    #[error("Unknown format '{name}'. Expected one of: json, yaml, toml.")]
    UnknownFormat {
        /// Format name or extension that failed to match.
        name: String,
    },
    /// An output already exists and overwriting was not requested.
    #[error("Output already exists: {path}. Use --force to overwrite.")]
    OutputExists {
        /// Existing path.
        path: PathBuf,
    },
    /// An output file could not be written.
    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Writing to standard output failed.
    #[error("Failed to write output: {source}")]
    Write {
        /// Underlying IO error.
        #[from]
        source: io::Error,
    },
    /// One or more files failed validation.
    #[error("{count} file(s) failed validation.")]
    ValidationFailed {
        /// Number of invalid files.
        count: usize,
    },
    /// A failure reported by a plug-in handler with its own exit code.
    #[error("{message}")]
    Failed {
        /// Exit code supplied by the handler.
        code: FailureCode,
        /// Error message supplied by the handler.
        message: String,
    },
}

impl Error {
    /// Build a handler failure with an explicit exit code.
    ///
    /// Reserved codes (zero and the internal-fault sentinel) fall back to the
    /// generic failure code.
    pub fn failed(code: u8, message: impl Into<String>) -> Self {
        Self::Failed {
            code: FailureCode::or_general(code),
            message: message.into(),
        }
    }

    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> FailureCode {
        match self {
            Self::NoCommand | Self::Usage { .. } | Self::UnknownFormat { .. } => {
                FailureCode::USAGE
            }
            Self::UnknownCommand { .. } => FailureCode::UNKNOWN_COMMAND,
            Self::DuplicateCommand { .. }
            | Self::UnknownDefault { .. }
            | Self::InvalidAlias { .. }
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::HomeDirMissing
            | Self::PathExpansion { .. } => FailureCode::CONFIG,
            Self::InputMissing { .. } | Self::InputRead { .. } => FailureCode::NO_INPUT,
            Self::Parse { .. } | Self::Serialize { .. } | Self::ValidationFailed { .. } => {
                FailureCode::DATA
            }
            Self::OutputExists { .. } | Self::OutputWrite { .. } => FailureCode::CANT_CREATE,
            Self::Write { .. } => FailureCode::IO,
            Self::Failed { code, .. } => *code,
        }
    }
}
