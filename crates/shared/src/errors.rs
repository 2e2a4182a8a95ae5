//! Structured error envelopes with stable, namespaced codes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, io};

/// Diagnostic key/value pairs carried by an envelope.
pub type ErrorMetadata = BTreeMap<String, String>;

/// Where a failure originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller-facing failures: rejected payloads, bad schema files, bad env.
    Expected,
    /// Failures outside the caller's control (I/O, serialization).
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Expected => "expected",
            Self::Unexpected => "unexpected",
        })
    }
}

/// Whether repeating the operation may succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// A retry may succeed.
    Retriable,
    /// A retry fails the same way.
    NonRetriable,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Retriable => "retriable",
            Self::NonRetriable => "non-retriable",
        })
    }
}

/// `namespace:code` pair, e.g. `validation:constraint_violation`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Code in an arbitrary namespace (`config`, `validation`, ...).
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    /// Payload missing or not a structured value.
    pub fn invalid_payload() -> Self {
        Self::new("validation", "invalid_payload")
    }

    /// One or more declared constraints were violated.
    pub fn constraint_violation() -> Self {
        Self::new("validation", "constraint_violation")
    }

    /// A payload's own violation formatter failed.
    pub fn formatter_failed() -> Self {
        Self::new("validation", "formatter_failed")
    }

    /// Requested resource does not exist.
    pub fn not_found() -> Self {
        Self::new("core", "not_found")
    }

    /// Caller lacks permission.
    pub fn permission_denied() -> Self {
        Self::new("core", "permission_denied")
    }

    /// Caller is not authenticated.
    pub fn unauthorized() -> Self {
        Self::new("core", "unauthorized")
    }

    /// Other I/O failure.
    pub fn io() -> Self {
        Self::new("core", "io")
    }

    /// Bug or serialization failure.
    pub fn internal() -> Self {
        Self::new("core", "internal")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Error shape shared by the config loader, validation, and CLI surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Origin category.
    pub kind: ErrorKind,
    /// Retry classification.
    pub class: ErrorClass,
    /// Stable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Diagnostic metadata (path, env var, payload name, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ErrorMetadata,
}

impl ErrorEnvelope {
    fn build(kind: ErrorKind, class: ErrorClass, code: ErrorCode, message: String) -> Self {
        Self {
            kind,
            class,
            code,
            message,
            metadata: ErrorMetadata::new(),
        }
    }

    /// Caller-facing, non-retriable failure.
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(ErrorKind::Expected, ErrorClass::NonRetriable, code, message.into())
    }

    /// Failure outside the caller's control.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>, class: ErrorClass) -> Self {
        Self::build(ErrorKind::Unexpected, class, code, message.into())
    }

    /// Attach one metadata entry, replacing any previous value for `key`.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {}: {}",
            self.kind, self.class, self.code, self.message
        )
    }
}

impl std::error::Error for ErrorEnvelope {}

impl From<io::Error> for ErrorEnvelope {
    fn from(error: io::Error) -> Self {
        let code = match error.kind() {
            io::ErrorKind::NotFound => ErrorCode::not_found(),
            io::ErrorKind::PermissionDenied => ErrorCode::permission_denied(),
            _ => ErrorCode::io(),
        };
        let class = match error.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted => {
                ErrorClass::Retriable
            },
            _ => ErrorClass::NonRetriable,
        };
        Self::unexpected(code, error.to_string(), class)
    }
}
