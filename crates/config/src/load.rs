//! Schema loading helpers (env + file + overrides).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::env::{ValidatorEnv, apply_env_overrides};
use crate::schema::{FieldEntry, SchemaFile, ValidatedSchemaFile};
use dtoguard_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use dtoguard_validation::FieldCase;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaFormat {
    Json,
    Toml,
}

/// Load a schema file from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`ValidatorEnv`)
/// - overrides JSON (partial schema file)
/// - schema JSON (file content)
/// - defaults (`SchemaFile::default()`)
pub fn load_schema_from_sources(
    schema_json: Option<&str>,
    overrides_json: Option<&str>,
    env: &ValidatorEnv,
) -> Result<ValidatedSchemaFile, ErrorEnvelope> {
    let mut file = match schema_json {
        None => SchemaFile::default(),
        Some(input) => parse_schema_unvalidated(input, SchemaFormat::Json)?,
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut file, overrides);
    }

    // env is applied last and also validates/compiles the resulting file.
    apply_env_overrides(file, env)
}

/// Load a schema file from an optional path.
pub fn load_schema_from_path(
    schema_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &ValidatorEnv,
) -> Result<ValidatedSchemaFile, ErrorEnvelope> {
    let mut file = match schema_path {
        None => SchemaFile::default(),
        Some(path) => {
            let text = read_schema_file(path)?;
            let format = detect_schema_format(path)?;
            parse_schema_unvalidated(&text, format)?
        },
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut file, overrides);
    }

    let loaded = apply_env_overrides(file, env)?;
    tracing::debug!(
        path = ?schema_path,
        payloads = loaded.payloads.len(),
        "schema file loaded"
    );
    Ok(loaded)
}

/// Load a schema file from std env and an optional path.
pub fn load_schema_std_env(
    schema_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<ValidatedSchemaFile, ErrorEnvelope> {
    let env = ValidatorEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_schema_from_path(schema_path, overrides_json, &env)
}

/// Serialize the file as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(file: &SchemaFile) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(file).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize schema file: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the file as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(file: &SchemaFile) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(file).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize schema TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn parse_schema_unvalidated(input: &str, format: SchemaFormat) -> Result<SchemaFile, ErrorEnvelope> {
    match format {
        SchemaFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid schema JSON: {error}"),
            )
            .with_metadata("source", "schema")
        }),
        SchemaFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid schema TOML: {error}"),
            )
            .with_metadata("source", "schema")
        }),
    }
}

fn parse_overrides_json(input: &str) -> Result<SchemaFileOverrides, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid overrides JSON: {error}"),
        )
        .with_metadata("source", "overrides")
    })
}

fn read_schema_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let reason = match error.kind() {
            std::io::ErrorKind::NotFound => "not_found",
            std::io::ErrorKind::PermissionDenied => "permission_denied",
            _ => "io",
        };

        ErrorEnvelope::expected(
            ErrorCode::new("config", "read_failed"),
            format!("failed to read schema file: {error}"),
        )
        .with_metadata("path", path.to_string_lossy().to_string())
        .with_metadata("reason", reason)
    })
}

fn detect_schema_format(path: &Path) -> Result<SchemaFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(SchemaFormat::Json),
        Some("toml") => Ok(SchemaFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported schema format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct SchemaFileOverrides {
    version: Option<u32>,
    settings: SettingsOverrides,
    payloads: BTreeMap<String, Vec<FieldEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct SettingsOverrides {
    separator: Option<String>,
    field_case: Option<FieldCase>,
    messages: BTreeMap<String, String>,
}

/// Scalars replace, message templates merge per tag, payloads replace per name.
fn apply_overrides(file: &mut SchemaFile, overrides: SchemaFileOverrides) {
    if let Some(version) = overrides.version {
        file.version = version;
    }
    if let Some(separator) = overrides.settings.separator {
        file.settings.separator = separator;
    }
    if let Some(field_case) = overrides.settings.field_case {
        file.settings.field_case = field_case;
    }
    file.settings.messages.extend(overrides.settings.messages);
    file.payloads.extend(overrides.payloads);
}
