//! Error types produced by the validation pipeline.

use crate::violation::Violation;
use dtoguard_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// Fixed message for payloads rejected on shape alone.
pub const INVALID_PAYLOAD_MESSAGE: &str = "invalid payload for validation";

/// Failure returned by the pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    /// The payload was missing or not a structured value.
    #[error("invalid payload for validation")]
    InvalidPayload,
    /// One or more declared constraints were violated.
    #[error("{message}")]
    Constraint {
        /// Joined, human-readable messages.
        message: String,
        /// Raw violations in evaluation order.
        violations: Vec<Violation>,
    },
    /// The payload's own violation formatter failed.
    #[error(transparent)]
    Formatter(#[from] FormatterError),
}

impl PayloadError {
    /// Raw violations, when the failure came from constraint checking.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Constraint { violations, .. } => violations,
            Self::InvalidPayload | Self::Formatter(_) => &[],
        }
    }

    /// Returns true for the shape error.
    #[must_use]
    pub const fn is_invalid_payload(&self) -> bool {
        matches!(self, Self::InvalidPayload)
    }
}

impl From<PayloadError> for ErrorEnvelope {
    fn from(error: PayloadError) -> Self {
        match &error {
            PayloadError::InvalidPayload => {
                Self::expected(ErrorCode::invalid_payload(), error.to_string())
            },
            PayloadError::Constraint { violations, .. } => {
                Self::expected(ErrorCode::constraint_violation(), error.to_string())
                    .with_metadata("violations", violations.len().to_string())
            },
            PayloadError::Formatter(_) => {
                Self::expected(ErrorCode::formatter_failed(), error.to_string())
            },
        }
    }
}

/// Error raised by a payload's custom violation formatter.
///
/// Its message is surfaced verbatim by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FormatterError {
    message: String,
}

impl FormatterError {
    /// Create a formatter error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Message surfaced to callers.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A rejected payload together with the reason.
///
/// The payload is handed back unchanged so callers can inspect what was
/// received; it is `None` only for the shape error on a missing payload.
pub struct Rejection<T> {
    payload: Option<T>,
    error: PayloadError,
}

impl<T> Rejection<T> {
    pub(crate) const fn new(payload: Option<T>, error: PayloadError) -> Self {
        Self { payload, error }
    }

    /// Borrow the rejected payload.
    pub const fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Borrow the failure reason.
    pub const fn error(&self) -> &PayloadError {
        &self.error
    }

    /// Split into payload and error.
    pub fn into_parts(self) -> (Option<T>, PayloadError) {
        (self.payload, self.error)
    }

    /// Drop the payload and keep the error.
    pub fn into_error(self) -> PayloadError {
        self.error
    }
}

impl<T> fmt::Debug for Rejection<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Rejection")
            .field("has_payload", &self.payload.is_some())
            .field("error", &self.error)
            .finish()
    }
}

impl<T> fmt::Display for Rejection<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, formatter)
    }
}

impl<T> std::error::Error for Rejection<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Rejection<T>> for PayloadError {
    fn from(rejection: Rejection<T>) -> Self {
        rejection.error
    }
}

/// Failure parsing a textual rule list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleParseError {
    /// A comma-separated segment had no tag.
    #[error("empty rule at position {position}")]
    EmptySegment {
        /// Zero-based segment index.
        position: usize,
    },
    /// A parameterized rule was declared without its parameter.
    #[error("rule `{tag}` requires a parameter")]
    MissingParam {
        /// Offending tag.
        tag: String,
    },
}

/// The process-wide message table was already installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("message table already installed")]
pub struct MessageTableInstalled;
