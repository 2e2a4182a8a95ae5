//! # dtoguard-shared
//!
//! Error envelopes shared by the dtoguard crates.
//!
//! Library errors (`PayloadError`, `ConfigSchemaError`, `EnvParseError`)
//! convert into an [`ErrorEnvelope`] at the config and CLI surfaces so every
//! failure carries a stable `namespace:code` plus diagnostic metadata.
//! This crate has no workspace dependencies.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;

pub use errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_with_their_namespace() {
        assert_eq!(ErrorCode::not_found().to_string(), "core:not_found");
        assert_eq!(
            ErrorCode::new("config", "invalid_env").to_string(),
            "config:invalid_env"
        );
        assert!(!shared_crate_version().is_empty());
    }
}
