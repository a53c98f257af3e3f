//! The argument window: process arguments after a fixed start offset.

use std::env;

/// Start offset for native hosts, where element 0 is the program path.
pub const ARG_OFFSET: usize = 1;

/// Return the tokens of `vector` from `offset` on.
///
/// An offset past the end yields an empty slice rather than a fault.
pub fn slice(vector: &[String], offset: usize) -> &[String] {
    vector.get(offset..).unwrap_or_default()
}

/// A read-only view over the argument vector starting at a fixed offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentWindow {
    /// Full argument vector as supplied by the host.
    vector: Vec<String>,
    /// Index of the first real argument.
    offset: usize,
}

impl ArgumentWindow {
    /// Create a window over `vector` starting at `offset`.
    pub fn new(vector: Vec<String>, offset: usize) -> Self {
        Self { vector, offset }
    }

    /// Create a window over the current process arguments.
    ///
    /// Tokens that are not valid UTF-8 are converted lossily.
    pub fn from_env(offset: usize) -> Self {
        let vector = env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        Self::new(vector, offset)
    }

    /// Return the tokens inside the window.
    pub fn tokens(&self) -> &[String] {
        slice(&self.vector, self.offset)
    }

    /// Number of tokens inside the window.
    pub fn len(&self) -> usize {
        self.tokens().len()
    }

    /// Whether the window holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }

    /// Split the window into a command token and its parameters.
    pub fn split_command(&self) -> Option<(&str, &[String])> {
        self.tokens()
            .split_first()
            .map(|(command, params)| (command.as_str(), params))
    }
}
