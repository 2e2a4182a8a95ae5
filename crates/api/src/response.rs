//! Response envelopes.
//!
//! Every response is `{"code", "status", "message", "data"}` where `code` is
//! the application result code and `status` the HTTP status. `data` is
//! omitted when absent.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP 200.
pub const STATUS_OK: u16 = 200;
/// HTTP 400.
pub const STATUS_BAD_REQUEST: u16 = 400;
/// HTTP 401.
pub const STATUS_UNAUTHORIZED: u16 = 401;
/// HTTP 403.
pub const STATUS_FORBIDDEN: u16 = 403;
/// HTTP 404.
pub const STATUS_NOT_FOUND: u16 = 404;
/// HTTP 500.
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

/// Application result code carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ResCode {
    /// The request succeeded.
    #[serde(rename = "10000")]
    Success,
    /// The request failed.
    #[serde(rename = "10001")]
    Failure,
}

impl ResCode {
    /// Wire form of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "10000",
            Self::Failure => "10001",
        }
    }
}

impl fmt::Display for ResCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiResponse<T> {
    /// Application result code.
    pub code: ResCode,
    /// HTTP status.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// Response body, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Envelope without a body.
pub type MessageResponse = ApiResponse<()>;

impl<T> ApiResponse<T> {
    /// Envelope with explicit code, status, and body.
    pub fn custom(code: ResCode, status: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code,
            status,
            message: message.into(),
            data,
        }
    }

    /// 200 with a body.
    pub fn success_data(message: impl Into<String>, data: T) -> Self {
        Self::custom(ResCode::Success, STATUS_OK, message, Some(data))
    }

    /// 200 without a body.
    pub fn success_msg(message: impl Into<String>) -> Self {
        Self::custom(ResCode::Success, STATUS_OK, message, None)
    }

    /// 400.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::failure(STATUS_BAD_REQUEST, message)
    }

    /// 401.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::failure(STATUS_UNAUTHORIZED, message)
    }

    /// 403.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::failure(STATUS_FORBIDDEN, message)
    }

    /// 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(STATUS_NOT_FOUND, message)
    }

    /// 500.
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::failure(STATUS_INTERNAL_SERVER_ERROR, message)
    }

    fn failure(status: u16, message: impl Into<String>) -> Self {
        Self::custom(ResCode::Failure, status, message, None)
    }

    /// Returns true for [`ResCode::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == ResCode::Success
    }

    /// Drop the body, keeping code, status, and message.
    #[must_use]
    pub fn without_data(self) -> MessageResponse {
        ApiResponse::custom(self.code, self.status, self.message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_is_omitted_when_absent() -> Result<(), serde_json::Error> {
        let response = MessageResponse::success_msg("created");
        assert_eq!(
            serde_json::to_value(&response)?,
            json!({"code": "10000", "status": 200, "message": "created"})
        );
        Ok(())
    }

    #[test]
    fn failures_carry_the_failure_code() {
        for (response, status) in [
            (MessageResponse::bad_request("x"), 400),
            (MessageResponse::unauthorized("x"), 401),
            (MessageResponse::forbidden("x"), 403),
            (MessageResponse::not_found("x"), 404),
            (MessageResponse::internal_server_error("x"), 500),
        ] {
            assert_eq!(response.code, ResCode::Failure);
            assert_eq!(response.status, status);
            assert!(!response.is_success());
        }
    }

    #[test]
    fn envelopes_deserialize_from_the_wire() -> Result<(), serde_json::Error> {
        let response: ApiResponse<Vec<u32>> = serde_json::from_value(json!({
            "code": "10000", "status": 200, "message": "ok", "data": [1, 2]
        }))?;
        assert_eq!(response, ApiResponse::success_data("ok", vec![1, 2]));
        Ok(())
    }
}
