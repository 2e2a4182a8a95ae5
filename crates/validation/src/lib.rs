//! # dtoguard-validation
//!
//! Validation pipeline for request payloads.
//!
//! A payload declares constraints per field (usually with
//! `#[derive(Payload)]`). [`validate_dto`] checks them, renders every
//! violation through a tag to template [`MessageTable`] and joins the
//! messages into a single error. Payloads may opt into two capabilities:
//!
//! - [`Normalize`]: return a canonical form after validation succeeds
//! - [`FormatViolations`]: render violations with their own messages
//!
//! Payloads known only at runtime are described with [`PayloadSchema`].

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

extern crate self as dtoguard_validation;

mod check;
/// Error types returned by the pipeline.
pub mod error;
mod formats;
/// Tag to template message table.
pub mod messages;
/// Payload contract and capability traits.
pub mod payload;
mod pipeline;
/// Constraint declarations.
pub mod rule;
/// Runtime payload schemas.
pub mod schema;
/// Rendering settings.
pub mod settings;
/// Field values seen by constraint checks.
pub mod value;
/// Constraint violations.
pub mod violation;

pub use check::CustomCheck;
pub use dtoguard_validate_derive::Payload;
pub use error::{
    FormatterError, INVALID_PAYLOAD_MESSAGE, MessageTableInstalled, PayloadError, Rejection,
    RuleParseError,
};
pub use messages::{
    FALLBACK_TEMPLATE, MessageTable, format_violations, install_message_table, message_table,
};
pub use payload::{Field, FormatViolations, Normalize, Payload};
pub use pipeline::{Validator, validate_dto, validate_ref};
pub use rule::{Rule, RuleKind};
pub use schema::{FieldSpec, JsonPayload, PayloadSchema};
pub use settings::{DEFAULT_SEPARATOR, FieldCase, UnknownFieldCase, ValidatorSettings};
pub use value::{AsFieldValue, FieldValue};
pub use violation::Violation;

/// Returns the validation crate version.
#[must_use]
pub const fn validation_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
