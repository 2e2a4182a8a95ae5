//! Payload contract and the two optional capability hooks.

use crate::error::FormatterError;
use crate::rule::Rule;
use crate::value::FieldValue;
use crate::violation::Violation;

/// One field of a payload, as presented to the pipeline.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    /// Declared identifier (used to resolve sibling references).
    pub name: &'a str,
    /// Display name used in violations and messages.
    pub display: &'a str,
    /// Current value.
    pub value: FieldValue<'a>,
    /// Declared constraints, in evaluation order.
    pub rules: &'a [Rule],
}

impl<'a> Field<'a> {
    /// Create a field view.
    pub const fn new(
        name: &'a str,
        display: &'a str,
        value: FieldValue<'a>,
        rules: &'a [Rule],
    ) -> Self {
        Self {
            name,
            display,
            value,
            rules,
        }
    }

    /// Returns true when `reference` names this field.
    #[must_use]
    pub fn answers_to(&self, reference: &str) -> bool {
        self.name == reference || self.display == reference
    }
}

/// A structured request value with declared per-field constraints.
///
/// Usually derived with `#[derive(Payload)]`; implement by hand for
/// payloads whose fields are only known at runtime.
pub trait Payload {
    /// Fields with their values and constraints, in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Custom violation formatter, when the payload supplies one.
    ///
    /// Returning `Some` replaces the default message table for this payload.
    fn violation_formatter(&self) -> Option<&dyn FormatViolations> {
        None
    }

    /// Canonical form handed to business logic after validation succeeds.
    fn normalized(self) -> Self
    where
        Self: Sized,
    {
        self
    }

    /// Type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Value-normalization capability.
///
/// Implementors derive internal fields from raw input (e.g. parsing a
/// string id into a structured identifier). Should be idempotent.
pub trait Normalize: Sized {
    /// Return the canonical form of `self`.
    fn normalize(self) -> Self;
}

/// Custom error-formatting capability.
pub trait FormatViolations {
    /// Render the raw violations as an ordered message list.
    ///
    /// An error here supersedes the validation failure itself.
    fn format_violations(&self, violations: &[Violation]) -> Result<Vec<String>, FormatterError>;
}
