//! API errors and their HTTP status mapping.

use dtoguard_shared::{ErrorCode, ErrorEnvelope, ErrorKind};
use dtoguard_validation::PayloadError;
use std::error::Error;
use std::fmt;

use crate::response::{
    STATUS_BAD_REQUEST, STATUS_FORBIDDEN, STATUS_INTERNAL_SERVER_ERROR, STATUS_NOT_FOUND,
    STATUS_UNAUTHORIZED,
};

/// Category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400.
    BadRequest,
    /// 401.
    Unauthorized,
    /// 403.
    Forbidden,
    /// 404.
    NotFound,
    /// 500.
    Internal,
}

impl ApiErrorKind {
    /// HTTP status for the kind.
    #[must_use]
    pub const fn status(self) -> u16 {
        match self {
            Self::BadRequest => STATUS_BAD_REQUEST,
            Self::Unauthorized => STATUS_UNAUTHORIZED,
            Self::Forbidden => STATUS_FORBIDDEN,
            Self::NotFound => STATUS_NOT_FOUND,
            Self::Internal => STATUS_INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Internal => "internal server error",
        };
        formatter.write_str(label)
    }
}

type BoxedSource = Box<dyn Error + Send + Sync + 'static>;

/// Error surfaced to API callers.
///
/// `message` is what the caller may see; `source` is the underlying cause
/// and is only exposed for internal errors in debug mode.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    #[source]
    source: Option<BoxedSource>,
}

impl ApiError {
    /// Error of `kind` without a cause.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// 400.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::BadRequest, message)
    }

    /// 401.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unauthorized, message)
    }

    /// 403.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Forbidden, message)
    }

    /// 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message)
    }

    /// 500.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Internal, message)
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Error category.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.kind.status()
    }

    /// Caller-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message of the cause, or the caller-facing message without one.
    #[must_use]
    pub fn detail(&self) -> String {
        self.source
            .as_ref()
            .map_or_else(|| self.message.clone(), ToString::to_string)
    }
}

impl From<PayloadError> for ApiError {
    fn from(error: PayloadError) -> Self {
        Self::bad_request(error.to_string()).with_source(error)
    }
}

impl From<ErrorEnvelope> for ApiError {
    fn from(envelope: ErrorEnvelope) -> Self {
        let kind = envelope_kind(&envelope);
        Self::new(kind, envelope.message.clone()).with_source(envelope)
    }
}

fn envelope_kind(envelope: &ErrorEnvelope) -> ApiErrorKind {
    let code = &envelope.code;
    if code == &ErrorCode::not_found() {
        return ApiErrorKind::NotFound;
    }
    if code == &ErrorCode::permission_denied() {
        return ApiErrorKind::Forbidden;
    }
    if code == &ErrorCode::unauthorized() {
        return ApiErrorKind::Unauthorized;
    }
    match envelope.kind {
        ErrorKind::Expected => ApiErrorKind::BadRequest,
        ErrorKind::Unexpected => ApiErrorKind::Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtoguard_shared::ErrorClass;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(ApiError::bad_request("x").status(), 400);
        assert_eq!(ApiError::unauthorized("x").status(), 401);
        assert_eq!(ApiError::forbidden("x").status(), 403);
        assert_eq!(ApiError::not_found("x").status(), 404);
        assert_eq!(ApiError::internal("x").status(), 500);
    }

    #[test]
    fn payload_errors_are_bad_requests() {
        let error = ApiError::from(PayloadError::InvalidPayload);
        assert_eq!(error.kind(), ApiErrorKind::BadRequest);
        assert_eq!(error.message(), "invalid payload for validation");
        assert!(error.source().is_some());
    }

    #[test]
    fn envelopes_map_by_code_then_kind() {
        let missing = ErrorEnvelope::expected(ErrorCode::not_found(), "no such user");
        assert_eq!(ApiError::from(missing).kind(), ApiErrorKind::NotFound);

        let denied = ErrorEnvelope::expected(ErrorCode::permission_denied(), "nope");
        assert_eq!(ApiError::from(denied).kind(), ApiErrorKind::Forbidden);

        let invalid = ErrorEnvelope::expected(ErrorCode::new("config", "invalid_env"), "bad");
        assert_eq!(ApiError::from(invalid).kind(), ApiErrorKind::BadRequest);

        let broken = ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            "db down",
            ErrorClass::Retriable,
        );
        assert_eq!(ApiError::from(broken).kind(), ApiErrorKind::Internal);
    }

    #[test]
    fn detail_prefers_the_cause() {
        let error = ApiError::internal("failed to load user")
            .with_source(std::io::Error::other("connection reset"));
        assert_eq!(error.detail(), "connection reset");
        assert_eq!(ApiError::internal("plain").detail(), "plain");
    }
}
