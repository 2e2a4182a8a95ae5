//! Payloads declared at runtime.
//!
//! A [`PayloadSchema`] is an explicit per-field constraint list that can be
//! built in code or loaded from a file, then checked against JSON values.
//! JSON objects nested inside a payload are opaque; only their entry count
//! is visible to rules.

use crate::error::{PayloadError, RuleParseError};
use crate::payload::{Field, Payload};
use crate::pipeline::{self, Validator};
use crate::rule::Rule;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Constraints declared for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    #[serde(default)]
    rules: Vec<Rule>,
}

impl FieldSpec {
    /// Field keyed by `name` in the payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display: None,
            rules: Vec::new(),
        }
    }

    /// Name used in violations instead of the key.
    #[must_use]
    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Append a parameterized rule.
    #[must_use]
    pub fn rule(
        mut self,
        tag: impl Into<Cow<'static, str>>,
        param: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.rules.push(Rule::with_param(tag, param));
        self
    }

    /// Append a parameterless rule.
    #[must_use]
    pub fn flag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.rules.push(Rule::new(tag));
        self
    }

    /// Append rules written as `required,min=3`.
    pub fn parse_rules(mut self, rules: &str) -> Result<Self, RuleParseError> {
        self.rules.extend(Rule::parse_list(rules)?);
        Ok(self)
    }

    /// Key of the field in the payload.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used in violations.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }

    /// Declared rules, in evaluation order.
    #[must_use]
    pub fn constraints(&self) -> &[Rule] {
        &self.rules
    }
}

/// Named list of field constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl PayloadSchema {
    /// Empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in evaluation order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// View a JSON value as a payload of this schema.
    ///
    /// Anything but a JSON object is the shape error.
    pub fn bind<'s>(&'s self, value: &'s serde_json::Value) -> Result<JsonPayload<'s>, PayloadError> {
        value
            .as_object()
            .map(|object| JsonPayload {
                schema: self,
                object,
            })
            .ok_or(PayloadError::InvalidPayload)
    }

    /// Validate a JSON value with the process-wide validator.
    pub fn validate_json(&self, value: &serde_json::Value) -> Result<(), PayloadError> {
        pipeline::validate_ref(&self.bind(value)?)
    }

    /// Validate a JSON value with `validator`.
    pub fn validate_json_with(
        &self,
        validator: &Validator,
        value: &serde_json::Value,
    ) -> Result<(), PayloadError> {
        validator.check(&self.bind(value)?)
    }
}

/// A JSON object checked against a [`PayloadSchema`].
#[derive(Debug, Clone, Copy)]
pub struct JsonPayload<'s> {
    schema: &'s PayloadSchema,
    object: &'s serde_json::Map<String, serde_json::Value>,
}

impl Payload for JsonPayload<'_> {
    fn fields(&self) -> Vec<Field<'_>> {
        self.schema
            .fields
            .iter()
            .map(|spec| {
                let value = self
                    .object
                    .get(&spec.name)
                    .map_or(FieldValue::Absent, FieldValue::from_json);
                Field::new(&spec.name, spec.display_name(), value, &spec.rules)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signup() -> Result<PayloadSchema, RuleParseError> {
        Ok(PayloadSchema::new("signup")
            .field(FieldSpec::new("name").flag("required"))
            .field(FieldSpec::new("age").rule("gte", "18"))
            .field(FieldSpec::new("email").parse_rules("omitempty,email")?))
    }

    #[test]
    fn json_objects_are_checked_field_by_field() -> Result<(), Box<dyn std::error::Error>> {
        let schema = signup()?;
        let error = schema
            .validate_json(&json!({"name": "", "age": 17}))
            .err()
            .ok_or("expected a rejection")?;
        assert_eq!(
            error.to_string(),
            "name is required, age must be greater than or equal to 18"
        );
        assert_eq!(error.violations().len(), 2);

        schema.validate_json(&json!({"name": "Ada", "age": 36, "extra": true}))?;
        Ok(())
    }

    #[test]
    fn non_objects_are_the_shape_error() -> Result<(), RuleParseError> {
        let schema = signup()?;
        for value in [json!(null), json!([1, 2]), json!("name"), json!(3)] {
            assert_eq!(schema.validate_json(&value), Err(PayloadError::InvalidPayload));
        }
        Ok(())
    }

    #[test]
    fn display_names_replace_keys_in_messages() -> Result<(), Box<dyn std::error::Error>> {
        let schema = PayloadSchema::new("page")
            .field(FieldSpec::new("page_size").display("PageSize").rule("max", "100"));
        let error = schema
            .validate_json(&json!({"page_size": 500}))
            .err()
            .ok_or("expected a rejection")?;
        assert_eq!(error.to_string(), "pagesize must be at most 100 characters");
        assert_eq!(
            error.violations().first().map(|violation| violation.namespace()),
            Some("PageSize")
        );
        Ok(())
    }

    #[test]
    fn schemas_deserialize_from_rule_objects() -> Result<(), serde_json::Error> {
        let schema: PayloadSchema = serde_json::from_value(json!({
            "name": "slug",
            "fields": [{"name": "slug", "rules": [{"tag": "min", "param": "3"}]}]
        }))?;
        assert_eq!(schema.fields().first().map(FieldSpec::constraints).map(<[Rule]>::len), Some(1));
        assert!(schema.validate_json(&json!({"slug": "ab"})).is_err());
        Ok(())
    }
}
