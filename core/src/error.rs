//! Error types for command execution.
//!
//! Every failure maps to an [`ErrorKind`] with a stable numeric code, which
//! is what a driver returns as its exit status.

use std::fmt;

use thiserror::Error;

use crate::exec::Dispatch;
use crate::value::ValueKind;

/// Outcome categories with stable numeric codes.
///
/// # Examples
///
/// ```
/// use cmdtree_core::ErrorKind;
///
/// assert_eq!(ErrorKind::Success.code(), 0);
/// assert_eq!(ErrorKind::ExtraArgumentsFound.code(), 6);
/// assert_eq!(ErrorKind::from_code(3), Some(ErrorKind::CommandNotFound));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Everything ran.
    Success,
    /// Unclassified failure.
    Unknown,
    /// Allocation failure; kept for code compatibility, the engine aborts
    /// on out-of-memory instead of reporting it.
    AllocFailed,
    /// No command matched, or help was requested with nothing resolved.
    CommandNotFound,
    /// Unknown option token or missing option value.
    OptionNotFound,
    /// A required argument was not supplied.
    ArgumentNotFound,
    /// Tokens remained after binding the leaf command's arguments.
    ExtraArgumentsFound,
}

impl ErrorKind {
    /// Numeric code.
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::Success => 0,
            ErrorKind::Unknown => 1,
            ErrorKind::AllocFailed => 2,
            ErrorKind::CommandNotFound => 3,
            ErrorKind::OptionNotFound => 4,
            ErrorKind::ArgumentNotFound => 5,
            ErrorKind::ExtraArgumentsFound => 6,
        }
    }

    /// Inverse of [`code`](ErrorKind::code).
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => ErrorKind::Success,
            1 => ErrorKind::Unknown,
            2 => ErrorKind::AllocFailed,
            3 => ErrorKind::CommandNotFound,
            4 => ErrorKind::OptionNotFound,
            5 => ErrorKind::ArgumentNotFound,
            6 => ErrorKind::ExtraArgumentsFound,
            _ => return None,
        })
    }

    /// Returns `true` for [`ErrorKind::Success`].
    pub fn is_success(self) -> bool {
        self == ErrorKind::Success
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Success => "success",
            ErrorKind::Unknown => "unknown error",
            ErrorKind::AllocFailed => "allocation failed",
            ErrorKind::CommandNotFound => "command not found",
            ErrorKind::OptionNotFound => "option not found",
            ErrorKind::ArgumentNotFound => "argument not found",
            ErrorKind::ExtraArgumentsFound => "extra arguments found",
        };
        f.write_str(name)
    }
}

/// Parse and dispatch failures. Each aborts the invocation at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// Nothing in the tree matched the tokens.
    #[error(
        "No valid sub-command found. Run main command with --help for a list of available sub-commands."
    )]
    CommandNotFound,
    /// A switch token named no known option.
    #[error("Unknown option {0}.")]
    UnknownOption(String),
    /// A value-bearing switch was the last token.
    #[error("Value missing for option {0}.")]
    OptionValueMissing(String),
    /// Strict arity: a required argument received no token.
    #[error("Required argument {0} missing.")]
    ArgumentMissing(String),
    /// Tokens left over after binding.
    #[error("{0} extra arguments found.")]
    ExtraArgumentsFound(usize),
    /// Strict values: a token could not be read as the declared kind.
    #[error("Invalid {kind} value '{text}' for {name}.")]
    InvalidValue {
        /// Option or argument name.
        name: String,
        /// Declared kind.
        kind: ValueKind,
        /// Offending token.
        text: String,
    },
}

impl ExecError {
    /// Category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecError::CommandNotFound => ErrorKind::CommandNotFound,
            ExecError::UnknownOption(_) | ExecError::OptionValueMissing(_) => {
                ErrorKind::OptionNotFound
            }
            ExecError::ArgumentMissing(_) => ErrorKind::ArgumentNotFound,
            ExecError::ExtraArgumentsFound(_) => ErrorKind::ExtraArgumentsFound,
            ExecError::InvalidValue { .. } => ErrorKind::Unknown,
        }
    }
}

/// An [`ExecError`] together with what the driver needs to report it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ExecFailure {
    /// What went wrong.
    #[source]
    pub error: ExecError,
    /// Help for the deepest resolved command, if any command resolved.
    pub help: Option<String>,
    /// Handlers of parent commands that already ran before the leaf's
    /// arguments were bound.
    pub dispatched: Vec<Dispatch>,
}

impl ExecFailure {
    pub(crate) fn new(error: ExecError, help: Option<String>) -> Self {
        Self {
            error,
            help,
            dispatched: Vec::new(),
        }
    }

    /// Category of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Numeric code of the underlying error.
    pub fn code(&self) -> i32 {
        self.kind().code()
    }
}

/// Failure reported by a command handler.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ErrorKind, HandlerError};
///
/// let err = HandlerError::new(ErrorKind::ArgumentNotFound, "no such file");
/// assert_eq!(err.to_string(), "no such file");
/// assert_eq!(err.kind.code(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    /// Category reported to the driver.
    pub kind: ErrorKind,
    /// Message printed after `Error: `.
    pub message: String,
}

impl HandlerError {
    /// Creates a handler error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an [`ErrorKind::Unknown`] handler error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in 0..7 {
            assert_eq!(ErrorKind::from_code(code).map(ErrorKind::code), Some(code));
        }
        assert_eq!(ErrorKind::from_code(7), None);
    }

    #[test]
    fn test_option_errors_share_a_kind() {
        assert_eq!(
            ExecError::UnknownOption("--x".into()).kind(),
            ErrorKind::OptionNotFound
        );
        assert_eq!(
            ExecError::OptionValueMissing("--x".into()).kind(),
            ErrorKind::OptionNotFound
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ExecError::UnknownOption("--bogus".into()).to_string(),
            "Unknown option --bogus."
        );
        assert_eq!(
            ExecError::ExtraArgumentsFound(2).to_string(),
            "2 extra arguments found."
        );
    }
}
