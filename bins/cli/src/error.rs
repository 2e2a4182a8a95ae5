use dtoguard_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use std::fmt;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    Failure = 1,
    Rejected = 2,
}

impl ExitCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug)]
pub enum CliError {
    Config(ErrorEnvelope),
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl CliError {
    /// Every error that stops a command before validation runs exits with 1.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => ExitCode::Failure,
        }
    }

    /// Structured form for machine-readable output.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Config(envelope) => envelope.clone(),
            Self::Io(error) => {
                ErrorEnvelope::from(std::io::Error::new(error.kind(), error.to_string()))
            },
            Self::Serialization(error) => ErrorEnvelope::unexpected(
                ErrorCode::internal(),
                error.to_string(),
                ErrorClass::NonRetriable,
            ),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(envelope) => write!(formatter, "{}", envelope.message),
            Self::Io(error) => write!(formatter, "io error: {error}"),
            Self::Serialization(error) => write!(formatter, "serialization error: {error}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ErrorEnvelope> for CliError {
    fn from(error: ErrorEnvelope) -> Self {
        Self::Config(error)
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}
