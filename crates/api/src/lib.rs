//! # dtoguard-api
//!
//! Response envelopes, API errors, and request extraction built on the
//! validation pipeline. Nothing here depends on an HTTP framework: handlers
//! pass raw bodies or parameter maps in and get envelopes back.

/// Reusable request DTOs.
pub mod dto;
/// API errors and status mapping.
pub mod error;
/// Request extraction helpers.
pub mod request;
/// Response envelopes.
pub mod response;
/// JSON Schema exports.
pub mod schema;
/// Envelope construction with outgoing validation.
pub mod sender;

pub use dto::{MAX_PAGE, OBJECT_ID_HEX_LEN, ObjectIdParam, Pagination, SlugParam, UuidParam};
pub use error::{ApiError, ApiErrorKind};
pub use request::{parse_headers, parse_json_body, parse_params, parse_query};
pub use response::{ApiResponse, MessageResponse, ResCode};
pub use schema::{
    message_response_schema, object_id_param_schema, pagination_schema, slug_param_schema,
    uuid_param_schema,
};
pub use sender::{GENERIC_INTERNAL_MESSAGE, ResponseSender};

/// Returns the api crate version.
#[must_use]
pub const fn api_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtoguard_shared::shared_crate_version;
    use dtoguard_validation::validation_crate_version;

    #[test]
    fn api_crate_compiles() {
        let version = api_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn api_can_use_validation_and_shared() {
        assert!(!validation_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
