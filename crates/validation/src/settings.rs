//! Runtime settings for message rendering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default separator between rendered messages.
pub const DEFAULT_SEPARATOR: &str = ", ";

/// Case convention applied to field names in default messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldCase {
    /// Lowercase the display name (`Name` renders as `name`).
    #[default]
    Lower,
    /// Use the display name exactly as declared.
    AsDeclared,
}

impl FieldCase {
    /// Apply the convention to a display name.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_lowercase(),
            Self::AsDeclared => name.to_string(),
        }
    }

    /// Stable textual form, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::AsDeclared => "as_declared",
        }
    }
}

impl fmt::Display for FieldCase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Unrecognized field-case name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field case `{0}` (expected `lower` or `as_declared`)")]
pub struct UnknownFieldCase(pub String);

impl FromStr for FieldCase {
    type Err = UnknownFieldCase;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lower" | "lowercase" => Ok(Self::Lower),
            "as_declared" | "as-declared" | "declared" => Ok(Self::AsDeclared),
            other => Err(UnknownFieldCase(other.to_string())),
        }
    }
}

/// How violations are rendered and joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorSettings {
    /// Separator placed between messages (never trailing).
    pub separator: String,
    /// Case convention for field names in default messages.
    pub field_case: FieldCase,
    /// Per-tag template overrides layered over the message table.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub messages: BTreeMap<String, String>,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            field_case: FieldCase::default(),
            messages: BTreeMap::new(),
        }
    }
}
