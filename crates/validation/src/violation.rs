//! Constraint violations reported by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field that failed a declared constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    field: Box<str>,
    namespace: Box<str>,
    tag: Box<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    param: Option<Box<str>>,
}

impl Violation {
    /// Create a violation.
    ///
    /// `field` is the display name as declared (not case-normalized);
    /// `namespace` is the dotted path from the payload root.
    pub fn new(
        field: impl Into<Box<str>>,
        namespace: impl Into<Box<str>>,
        tag: impl Into<Box<str>>,
        param: Option<&str>,
    ) -> Self {
        Self {
            field: field.into(),
            namespace: namespace.into(),
            tag: tag.into(),
            param: param.map(Into::into),
        }
    }

    /// Display name of the offending field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Dotted path to the field, e.g. `address.city` or `tags[1]`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Tag of the violated constraint.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Parameter of the violated constraint.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(formatter, "{}: {}={param}", self.namespace, self.tag),
            None => write!(formatter, "{}: {}", self.namespace, self.tag),
        }
    }
}
