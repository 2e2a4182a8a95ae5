//! Reusable request DTOs for identifiers, slugs, and pagination.
//!
//! Each DTO renders its own violation messages using the capitalized field
//! name (`Id is required`), and identifier DTOs normalize their raw text
//! into a parsed value once validation passes.

use dtoguard_validation::{FormatViolations, FormatterError, Normalize, Payload, Violation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Length of a hex-encoded object id.
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// Largest page number and page size accepted by [`Pagination`].
pub const MAX_PAGE: i64 = 1000;

/// UUID path or query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Payload)]
#[validate(normalize, messages)]
pub struct UuidParam {
    /// Raw identifier text.
    #[validate(required, uuid, field = "Id")]
    pub id: String,
    /// Parsed identifier, set once validation passes.
    #[serde(skip)]
    pub uuid: Option<uuid::Uuid>,
}

impl UuidParam {
    /// Parameter holding `id`, not yet parsed.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uuid: None,
        }
    }
}

impl Normalize for UuidParam {
    fn normalize(mut self) -> Self {
        self.uuid = uuid::Uuid::parse_str(&self.id).ok();
        self
    }
}

impl FormatViolations for UuidParam {
    fn format_violations(&self, violations: &[Violation]) -> Result<Vec<String>, FormatterError> {
        Ok(violations
            .iter()
            .map(|violation| match violation.tag() {
                "required" => format!("{} is required", violation.field()),
                "uuid" => format!("{} must be a valid UUID", violation.field()),
                _ => format!("{} is invalid", violation.field()),
            })
            .collect())
    }
}

/// Hex-encoded 12-byte object id parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Payload)]
#[validate(normalize, messages)]
pub struct ObjectIdParam {
    /// Raw identifier text.
    #[validate(required, len = 24, hexadecimal, field = "Id")]
    pub id: String,
    /// Decoded identifier, set once validation passes.
    #[serde(skip)]
    pub bytes: Option<[u8; 12]>,
}

impl ObjectIdParam {
    /// Parameter holding `id`, not yet decoded.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bytes: None,
        }
    }

    /// Lowercase hex form of the decoded id.
    #[must_use]
    pub fn to_hex(&self) -> Option<String> {
        self.bytes
            .map(|bytes| bytes.iter().map(|byte| format!("{byte:02x}")).collect())
    }
}

impl Normalize for ObjectIdParam {
    fn normalize(mut self) -> Self {
        self.bytes = decode_object_id(&self.id);
        self
    }
}

impl FormatViolations for ObjectIdParam {
    fn format_violations(&self, violations: &[Violation]) -> Result<Vec<String>, FormatterError> {
        Ok(violations
            .iter()
            .map(|violation| match (violation.tag(), violation.param()) {
                ("required", _) => format!("{} is required", violation.field()),
                ("len", Some(param)) => {
                    format!("{} must be of length {param}", violation.field())
                },
                ("hexadecimal", _) => format!("{} must be hexadecimal", violation.field()),
                _ => format!("{} is invalid", violation.field()),
            })
            .collect())
    }
}

fn decode_object_id(text: &str) -> Option<[u8; 12]> {
    if text.len() != OBJECT_ID_HEX_LEN || !text.is_ascii() {
        return None;
    }
    let mut bytes = [0_u8; 12];
    for (slot, pair) in bytes.iter_mut().zip(text.as_bytes().chunks_exact(2)) {
        let pair = std::str::from_utf8(pair).ok()?;
        *slot = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(bytes)
}

/// URL slug parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Payload)]
#[validate(messages)]
pub struct SlugParam {
    /// Slug text.
    #[validate(required, min = 3, max = 200, field = "Slug")]
    pub slug: String,
}

impl FormatViolations for SlugParam {
    fn format_violations(&self, violations: &[Violation]) -> Result<Vec<String>, FormatterError> {
        Ok(violations.iter().map(bounded_message).collect())
    }
}

/// Page selection for list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Payload)]
#[validate(messages)]
pub struct Pagination {
    /// One-based page number.
    #[validate(required, min = 1, max = 1000, field = "Page")]
    pub page: i64,
    /// Page size.
    #[validate(required, min = 1, max = 1000, field = "Limit")]
    pub limit: i64,
}

impl Pagination {
    /// Number of items before the selected page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl FormatViolations for Pagination {
    fn format_violations(&self, violations: &[Violation]) -> Result<Vec<String>, FormatterError> {
        Ok(violations
            .iter()
            .map(|violation| match (violation.tag(), violation.param()) {
                ("required", _) => format!("{} is required", violation.field()),
                ("min", Some(param)) => format!("{} must be min{param}", violation.field()),
                ("max", Some(param)) => format!("{} must be max{param}", violation.field()),
                _ => format!("{} is invalid", violation.field()),
            })
            .collect())
    }
}

fn bounded_message(violation: &Violation) -> String {
    let field = violation.field();
    match (violation.tag(), violation.param()) {
        ("required", _) => format!("{field} is required"),
        ("min", Some(param)) => format!("{field} must be at least {param} characters"),
        ("max", Some(param)) => format!("{field} must be at most {param} characters"),
        _ => format!("{field} is invalid"),
    }
}
