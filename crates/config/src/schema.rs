//! Schema file format and its validation.
//!
//! A schema file declares validator settings and a set of named payloads,
//! each an ordered list of fields with rules in `required,min=3` notation:
//!
//! ```toml
//! version = 1
//!
//! [settings]
//! separator = "; "
//!
//! [[payloads.signup]]
//! field = "name"
//! rules = "required,min=3"
//! ```

use dtoguard_shared::{ErrorCode, ErrorEnvelope};
use dtoguard_validation::{FieldSpec, PayloadSchema, RuleParseError, Validator, ValidatorSettings};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Current schema file version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Schema file as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct SchemaFile {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Rendering settings for the validator built from this file.
    pub settings: ValidatorSettings,
    /// Payload declarations keyed by payload name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub payloads: BTreeMap<String, Vec<FieldEntry>>,
}

impl Default for SchemaFile {
    fn default() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            settings: ValidatorSettings::default(),
            payloads: BTreeMap::new(),
        }
    }
}

/// One declared field of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    /// Key of the field in the payload.
    pub field: String,
    /// Name used in violation messages instead of the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Comma-separated rules, e.g. `required,min=3`.
    #[serde(default)]
    pub rules: String,
}

impl SchemaFile {
    /// Validate the file and compile its payload declarations.
    pub fn validate_and_compile(self) -> Result<ValidatedSchemaFile, ConfigSchemaError> {
        self.validate_version()?;
        if self.settings.separator.is_empty() {
            return Err(ConfigSchemaError::EmptySeparator);
        }
        for (tag, template) in &self.settings.messages {
            if tag.trim().is_empty() {
                return Err(ConfigSchemaError::EmptyMessageTag);
            }
            if template.trim().is_empty() {
                return Err(ConfigSchemaError::EmptyTemplate { tag: tag.clone() });
            }
        }

        let mut schemas = BTreeMap::new();
        for (name, entries) in &self.payloads {
            schemas.insert(name.clone(), compile_payload(name, entries)?);
        }

        Ok(ValidatedSchemaFile { raw: self, schemas })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_SCHEMA_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        Ok(())
    }
}

fn compile_payload(name: &str, entries: &[FieldEntry]) -> Result<PayloadSchema, ConfigSchemaError> {
    if name.trim().is_empty() {
        return Err(ConfigSchemaError::EmptyPayloadName);
    }

    let mut seen = BTreeSet::new();
    let mut schema = PayloadSchema::new(name);
    for entry in entries {
        let field = entry.field.trim();
        if field.is_empty() {
            return Err(ConfigSchemaError::EmptyFieldName {
                payload: name.to_string(),
            });
        }
        if !seen.insert(field) {
            return Err(ConfigSchemaError::DuplicateField {
                payload: name.to_string(),
                field: field.to_string(),
            });
        }

        let mut spec = FieldSpec::new(field);
        if let Some(display) = entry
            .display
            .as_deref()
            .map(str::trim)
            .filter(|display| !display.is_empty())
        {
            spec = spec.display(display);
        }
        let spec = spec
            .parse_rules(&entry.rules)
            .map_err(|source| ConfigSchemaError::InvalidRule {
                payload: name.to_string(),
                field: field.to_string(),
                source,
            })?;
        schema = schema.field(spec);
    }
    Ok(schema)
}

/// Schema file whose payloads compiled cleanly.
#[derive(Debug, Clone)]
pub struct ValidatedSchemaFile {
    raw: SchemaFile,
    schemas: BTreeMap<String, PayloadSchema>,
}

impl ValidatedSchemaFile {
    /// Compiled schema for `name`.
    pub fn payload(&self, name: &str) -> Result<&PayloadSchema, ErrorEnvelope> {
        self.schemas.get(name).ok_or_else(|| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "unknown_payload"),
                format!("no payload named `{name}` in schema file"),
            )
            .with_metadata("payload", name.to_string())
            .with_metadata("known", self.payload_names().collect::<Vec<_>>().join(","))
        })
    }

    /// Declared payload names, sorted.
    pub fn payload_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Rendering settings.
    #[must_use]
    pub const fn settings(&self) -> &ValidatorSettings {
        &self.raw.settings
    }

    /// Validator configured with this file's settings.
    #[must_use]
    pub fn validator(&self) -> Validator {
        Validator::new().with_settings(self.raw.settings.clone())
    }

    /// Borrow the raw file.
    #[must_use]
    pub const fn as_ref(&self) -> &SchemaFile {
        &self.raw
    }

    /// Consume the wrapper and return the raw file.
    #[must_use]
    pub fn into_inner(self) -> SchemaFile {
        self.raw
    }
}

impl AsRef<SchemaFile> for ValidatedSchemaFile {
    fn as_ref(&self) -> &SchemaFile {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedSchemaFile {
    type Target = SchemaFile;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// JSON Schema describing the schema file format.
#[must_use]
pub fn schema_file_json_schema() -> schemars::Schema {
    schemars::schema_for!(SchemaFile)
}

/// Parse a schema file from a JSON string, then validate it.
pub fn parse_schema_file_json(input: &str) -> Result<ValidatedSchemaFile, ErrorEnvelope> {
    let file: SchemaFile = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid schema JSON: {error}"),
        )
    })?;

    file.validate_and_compile().map_err(Into::into)
}

/// Parse a schema file from a TOML string, then validate it.
pub fn parse_schema_file_toml(input: &str) -> Result<ValidatedSchemaFile, ErrorEnvelope> {
    let file: SchemaFile = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid schema TOML: {error}"),
        )
    })?;

    file.validate_and_compile().map_err(Into::into)
}

/// Schema file validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The schema version is not supported by this build.
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// `settings.separator` is empty.
    EmptySeparator,
    /// A `settings.messages` key is blank.
    EmptyMessageTag,
    /// A `settings.messages` template is blank.
    EmptyTemplate {
        /// Tag the template was declared for.
        tag: String,
    },
    /// A payload name is blank.
    EmptyPayloadName,
    /// A field entry has a blank `field`.
    EmptyFieldName {
        /// Payload declaring the field.
        payload: String,
    },
    /// The same field is declared twice in one payload.
    DuplicateField {
        /// Payload declaring the field.
        payload: String,
        /// Repeated field key.
        field: String,
    },
    /// A field's rule list did not parse.
    InvalidRule {
        /// Payload declaring the field.
        payload: String,
        /// Field whose rules failed.
        field: String,
        /// Parse failure.
        source: RuleParseError,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::EmptySeparator => ErrorCode::new("config", "invalid_separator"),
            Self::EmptyMessageTag | Self::EmptyTemplate { .. } => {
                ErrorCode::new("config", "invalid_template")
            },
            Self::EmptyPayloadName | Self::EmptyFieldName { .. } | Self::DuplicateField { .. } => {
                ErrorCode::new("config", "invalid_payload")
            },
            Self::InvalidRule { .. } => ErrorCode::new("config", "invalid_rule"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported schema version: {found} (supported: {supported})"
            ),
            Self::EmptySeparator => formatter.write_str("settings.separator must be non-empty"),
            Self::EmptyMessageTag => {
                formatter.write_str("settings.messages keys must be non-empty")
            },
            Self::EmptyTemplate { tag } => {
                write!(formatter, "settings.messages.{tag} must be non-empty")
            },
            Self::EmptyPayloadName => formatter.write_str("payload names must be non-empty"),
            Self::EmptyFieldName { payload } => {
                write!(formatter, "payloads.{payload} has a field without a name")
            },
            Self::DuplicateField { payload, field } => {
                write!(formatter, "payloads.{payload} declares `{field}` twice")
            },
            Self::InvalidRule {
                payload,
                field,
                source,
            } => write!(
                formatter,
                "invalid rules for payloads.{payload}.{field}: {source}"
            ),
        }
    }
}

impl std::error::Error for ConfigSchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRule { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => {
                envelope = envelope
                    .with_metadata("found", found.to_string())
                    .with_metadata("supported", supported.to_string());
            },
            ConfigSchemaError::EmptyTemplate { tag } => {
                envelope = envelope.with_metadata("tag", tag);
            },
            ConfigSchemaError::EmptyFieldName { payload } => {
                envelope = envelope.with_metadata("payload", payload);
            },
            ConfigSchemaError::DuplicateField { payload, field }
            | ConfigSchemaError::InvalidRule { payload, field, .. } => {
                envelope = envelope
                    .with_metadata("payload", payload)
                    .with_metadata("field", field);
            },
            ConfigSchemaError::EmptySeparator
            | ConfigSchemaError::EmptyMessageTag
            | ConfigSchemaError::EmptyPayloadName => {},
        }

        envelope
    }
}
