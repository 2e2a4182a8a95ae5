//! Turning results into response envelopes.

use crate::error::{ApiError, ApiErrorKind};
use crate::response::{ApiResponse, MessageResponse, ResCode};
use dtoguard_validation::{Payload, validate_ref};
use std::error::Error;

/// Message sent in place of internal error details outside debug mode.
pub const GENERIC_INTERNAL_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Message sent when a mixed error carries nothing to report.
pub const UNKNOWN_ERROR_MESSAGE: &str = "something went wrong";

/// Builds response envelopes.
///
/// Outgoing bodies are validated again before they are sent; a body that
/// fails its own constraints becomes a 500 carrying the violation message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseSender {
    debug: bool,
}

impl ResponseSender {
    /// Sender that exposes internal error details when `debug` is set.
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Returns true when internal details are exposed.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// 200 without a body.
    #[must_use]
    pub fn send_msg(&self, message: impl Into<String>) -> MessageResponse {
        ApiResponse::success_msg(message)
    }

    /// 200 with a validated body.
    pub fn send_data<T: Payload>(&self, message: impl Into<String>, data: T) -> ApiResponse<T> {
        checked(ApiResponse::success_data(message, data))
    }

    /// Envelope with explicit code and status; a body is validated.
    pub fn send_custom<T: Payload>(
        &self,
        code: ResCode,
        status: u16,
        message: impl Into<String>,
        data: Option<T>,
    ) -> ApiResponse<T> {
        checked(ApiResponse::custom(code, status, message, data))
    }

    /// Envelope for an [`ApiError`].
    ///
    /// Internal errors carry [`GENERIC_INTERNAL_MESSAGE`] unless the sender
    /// is in debug mode, in which case the cause is reported.
    #[must_use]
    pub fn send_error(&self, error: &ApiError) -> MessageResponse {
        match error.kind() {
            ApiErrorKind::BadRequest => ApiResponse::bad_request(error.message()),
            ApiErrorKind::Unauthorized => ApiResponse::unauthorized(error.message()),
            ApiErrorKind::Forbidden => ApiResponse::forbidden(error.message()),
            ApiErrorKind::NotFound => ApiResponse::not_found(error.message()),
            ApiErrorKind::Internal => {
                tracing::error!(error = %error.detail(), "internal error sent");
                if self.debug {
                    ApiResponse::internal_server_error(error.detail())
                } else {
                    ApiResponse::internal_server_error(GENERIC_INTERNAL_MESSAGE)
                }
            },
        }
    }

    /// Envelope for an arbitrary error.
    ///
    /// The first [`ApiError`] in the source chain keeps its kind; anything
    /// else is internal.
    #[must_use]
    pub fn send_mixed(&self, error: Option<&(dyn Error + 'static)>) -> MessageResponse {
        let Some(error) = error else {
            return self.send_error(&ApiError::internal(UNKNOWN_ERROR_MESSAGE));
        };
        let api_error = std::iter::successors(Some(error), |current| (*current).source())
            .find_map(|current| current.downcast_ref::<ApiError>());
        if let Some(api_error) = api_error {
            return self.send_error(api_error);
        }
        self.send_error(&ApiError::internal(error.to_string()))
    }

    /// Envelope for a handler result.
    pub fn send_result<T: Payload>(
        &self,
        message: impl Into<String>,
        result: Result<T, ApiError>,
    ) -> ApiResponse<T> {
        match result {
            Ok(data) => self.send_data(message, data),
            Err(error) => {
                let response = self.send_error(&error);
                ApiResponse::custom(response.code, response.status, response.message, None)
            },
        }
    }
}

fn checked<T: Payload>(response: ApiResponse<T>) -> ApiResponse<T> {
    let Some(data) = response.data.as_ref() else {
        return response;
    };
    match validate_ref(data) {
        Ok(()) => response,
        Err(error) => {
            tracing::warn!(
                payload = data.type_name(),
                error = %error,
                "outgoing response failed validation"
            );
            ApiResponse::internal_server_error(error.to_string())
        },
    }
}
