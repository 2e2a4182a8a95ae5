//! Environment overrides for validator settings.

use crate::schema::{SchemaFile, ValidatedSchemaFile};
use dtoguard_shared::{ErrorCode, ErrorEnvelope};
use dtoguard_validation::FieldCase;
use std::collections::BTreeMap;
use std::fmt;

/// Separator placed between rendered messages.
pub const ENV_SEPARATOR: &str = "DTOGUARD_SEPARATOR";
/// Field-name case convention (`lower` or `as_declared`).
pub const ENV_FIELD_CASE: &str = "DTOGUARD_FIELD_CASE";

/// Variables read by [`ValidatorEnv::from_std_env`].
pub const ENV_VARS: [&str; 2] = [ENV_SEPARATOR, ENV_FIELD_CASE];

/// Parsed env overrides; `None` leaves the file value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorEnv {
    /// Override for `settings.separator`.
    pub separator: Option<String>,
    /// Override for `settings.field_case`.
    pub field_case: Option<FieldCase>,
}

impl ValidatorEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            separator: parse_optional_separator(map, ENV_SEPARATOR)?,
            field_case: parse_optional_field_case(map, ENV_FIELD_CASE)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }
        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.separator.is_none() && self.field_case.is_none()
    }
}

/// Apply env overrides, then validate and compile the file.
pub fn apply_env_overrides(
    mut file: SchemaFile,
    env: &ValidatorEnv,
) -> Result<ValidatedSchemaFile, ErrorEnvelope> {
    if let Some(separator) = &env.separator {
        file.settings.separator.clone_from(separator);
    }
    if let Some(field_case) = env.field_case {
        file.settings.field_case = field_case;
    }

    file.validate_and_compile().map_err(ErrorEnvelope::from)
}

/// Env parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// Variable is set but empty.
    EmptyValue {
        /// Variable name.
        var: &'static str,
    },
    /// Variable does not name a known option.
    InvalidEnum {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code() -> ErrorCode {
        ErrorCode::new("config", "invalid_env")
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let message = error.to_string();
        let envelope = Self::expected(EnvParseError::error_code(), message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", value),
        }
    }
}

fn parse_optional_separator(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<String>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    // Surrounding spaces are part of a separator such as `", "`.
    if raw.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(raw.clone()))
}

fn parse_optional_field_case(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<FieldCase>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    if raw.trim().is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    raw.parse::<FieldCase>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidEnum {
            var,
            value: raw.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn parses_both_overrides() -> Result<(), EnvParseError> {
        let env = ValidatorEnv::from_map(&env_map(&[
            (ENV_SEPARATOR, " | "),
            (ENV_FIELD_CASE, "As_Declared"),
        ]))?;
        assert_eq!(env.separator.as_deref(), Some(" | "));
        assert_eq!(env.field_case, Some(FieldCase::AsDeclared));
        Ok(())
    }

    #[test]
    fn missing_vars_leave_overrides_unset() -> Result<(), EnvParseError> {
        let env = ValidatorEnv::from_map(&BTreeMap::new())?;
        assert!(env.is_empty());
        Ok(())
    }

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(
            ValidatorEnv::from_map(&env_map(&[(ENV_SEPARATOR, "")])),
            Err(EnvParseError::EmptyValue { var: ENV_SEPARATOR })
        );
        assert_eq!(
            ValidatorEnv::from_map(&env_map(&[(ENV_FIELD_CASE, "  ")])),
            Err(EnvParseError::EmptyValue {
                var: ENV_FIELD_CASE
            })
        );
    }

    #[test]
    fn unknown_case_maps_to_invalid_env() -> Result<(), Box<dyn std::error::Error>> {
        let error = ValidatorEnv::from_map(&env_map(&[(ENV_FIELD_CASE, "camel")]))
            .err()
            .ok_or("expected an error")?;
        let envelope = ErrorEnvelope::from(error);
        assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env"));
        assert_eq!(
            envelope.metadata.get("env_var").map(String::as_str),
            Some(ENV_FIELD_CASE)
        );
        assert_eq!(
            envelope.metadata.get("value").map(String::as_str),
            Some("camel")
        );
        Ok(())
    }

    #[test]
    fn overrides_replace_file_settings() -> Result<(), ErrorEnvelope> {
        let env = ValidatorEnv {
            separator: Some(" / ".to_string()),
            field_case: Some(FieldCase::AsDeclared),
        };
        let file = apply_env_overrides(SchemaFile::default(), &env)?;
        assert_eq!(file.settings().separator, " / ");
        assert_eq!(file.settings().field_case, FieldCase::AsDeclared);
        Ok(())
    }
}
