//! Execution outcomes and the process exit-code table.
//!
//! Every dispatch resolves to exactly one [`Outcome`], and every outcome maps
//! to exactly one exit code. The numeric values below are part of the public
//! interface: scripts match on them, so they are never renumbered.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 1    | generic handled failure |
//! | 2    | usage error (no command, bad parameters) |
//! | 65   | input data could not be parsed |
//! | 66   | input missing or unreadable |
//! | 70   | internal fault (contained panic) |
//! | 73   | output could not be created |
//! | 74   | other I/O failure |
//! | 78   | configuration error |
//! | 127  | unknown command |

use std::{fmt, io::Write};

use crate::palette;

/// Exit code for a handler that completed normally.
pub const SUCCESS: u8 = 0;

/// Exit code for a contained, unanticipated fault. No handled failure ever uses it.
pub const INTERNAL_FAULT: u8 = 70;

/// A nonzero exit code for a recognized, user-facing failure.
///
/// The sentinel [`INTERNAL_FAULT`] and zero cannot be represented, so a handled
/// failure is always distinguishable from success and from a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FailureCode(u8);

impl FailureCode {
    /// Generic failure.
    pub const GENERAL: Self = Self(1);
    /// Missing command or malformed parameters.
    pub const USAGE: Self = Self(2);
    /// Input data was malformed.
    pub const DATA: Self = Self(65);
    /// Input file was missing or unreadable.
    pub const NO_INPUT: Self = Self(66);
    /// Output could not be created.
    pub const CANT_CREATE: Self = Self(73);
    /// Other input/output failure.
    pub const IO: Self = Self(74);
    /// Invalid configuration.
    pub const CONFIG: Self = Self(78);
    /// The first token did not name a registered command.
    pub const UNKNOWN_COMMAND: Self = Self(127);

    /// Build a failure code, rejecting zero and the internal-fault sentinel.
    pub fn new(code: u8) -> Option<Self> {
        match code {
            SUCCESS | INTERNAL_FAULT => None,
            code => Some(Self(code)),
        }
    }

    /// Build a failure code, falling back to [`Self::GENERAL`] for reserved values.
    pub fn or_general(code: u8) -> Self {
        Self::new(code).unwrap_or(Self::GENERAL)
    }

    /// Return the numeric exit code.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The classified result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler completed normally.
    Success,
    /// A recognized failure with a handler- or dispatcher-supplied code.
    HandledFailure {
        /// Exit code for the failure.
        code: FailureCode,
        /// Human-readable description.
        message: String,
    },
    /// An unanticipated fault contained at the dispatch boundary.
    UnhandledFault {
        /// Description of the underlying cause.
        cause: String,
    },
}

impl Outcome {
    /// Build a handled failure.
    pub fn failure(code: FailureCode, message: impl Into<String>) -> Self {
        Self::HandledFailure {
            code,
            message: message.into(),
        }
    }

    /// Map the outcome onto the exit-code table.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success => SUCCESS,
            Self::HandledFailure { code, .. } => code.get(),
            Self::UnhandledFault { .. } => INTERNAL_FAULT,
        }
    }

    /// Whether the outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Write the diagnostic for this outcome to the error channel.
    ///
    /// Success writes nothing. Handled failures and faults use different
    /// prefixes so callers can tell a user error from a defect. Write errors
    /// are ignored: reporting must never fail.
    pub fn report(&self, err: &mut dyn Write, use_color: bool) {
        match self {
            Self::Success => {}
            Self::HandledFailure { message, .. } => {
                let prefix = palette::paint("error:", palette::error(), use_color);
                emit(err, format_args!("{prefix} {message}\n"));
            }
            Self::UnhandledFault { cause } => {
                let prefix = palette::paint("internal error:", palette::internal_error(), use_color);
                emit(
                    err,
                    format_args!(
                        "{prefix} an unexpected internal error occurred: {cause}\n\
                         This is a bug in cmdgate; please report it.\n"
                    ),
                );
            }
        }
    }
}

/// Write to a diagnostic channel, dropping I/O errors.
pub(crate) fn emit(writer: &mut dyn Write, args: fmt::Arguments<'_>) {
    if let Err(error) = writer.write_fmt(args) {
        tracing::debug!(%error, "diagnostic write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureCode, INTERNAL_FAULT, Outcome};

    #[test]
    fn rejects_reserved_codes() {
        assert!(FailureCode::new(0).is_none());
        assert!(FailureCode::new(INTERNAL_FAULT).is_none());
        assert_eq!(FailureCode::new(9).map(FailureCode::get), Some(9));
        assert_eq!(FailureCode::or_general(INTERNAL_FAULT), FailureCode::GENERAL);
    }

    #[test]
    fn maps_outcomes_to_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(
            Outcome::failure(FailureCode::UNKNOWN_COMMAND, "nope").exit_code(),
            127
        );
        let fault = Outcome::UnhandledFault {
            cause: "boom".to_string(),
        };
        assert_eq!(fault.exit_code(), INTERNAL_FAULT);
    }

    #[test]
    fn reports_are_distinguishable() {
        let mut handled = Vec::new();
        Outcome::failure(FailureCode::USAGE, "missing input").report(&mut handled, false);
        let handled = String::from_utf8(handled).expect("utf8");
        assert_eq!(handled, "error: missing input\n");

        let mut fault = Vec::new();
        Outcome::UnhandledFault {
            cause: "index out of bounds".to_string(),
        }
        .report(&mut fault, false);
        let fault = String::from_utf8(fault).expect("utf8");
        assert!(fault.starts_with("internal error:"));
        assert!(fault.contains("index out of bounds"));
    }

    #[test]
    fn success_reports_nothing() {
        let mut out = Vec::new();
        Outcome::Success.report(&mut out, true);
        assert!(out.is_empty());
    }
}
