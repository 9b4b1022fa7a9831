//! Fakedate error types.

use thiserror::Error;

/// Errors raised by the factory and by strict formatters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FakeDateError {
    /// A configuration field holds something other than a number.
    #[error("expected number for {name} but found {found}")]
    NotANumber {
        /// Name of the offending option (`referenceTime` or `timezoneOffset`).
        name: &'static str,
        /// Type name of the value that was supplied.
        found: String,
    },

    /// A configuration field holds a number with a fractional part.
    #[error("expected integer for {name} but found {found}")]
    NotAnInteger {
        /// Name of the offending option.
        name: &'static str,
        /// The value that was supplied.
        found: String,
    },

    /// The options input could not be read at all.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// ISO formatting was asked of an invalid instant.
    #[error("Invalid time value")]
    InvalidTimeValue,
}
