//! Tag to template message table.
//!
//! Templates use `{field}` and `{param}` placeholders. A template that has
//! no `{param}` simply ignores the constraint parameter, and a missing
//! parameter renders as an empty string.

use crate::error::MessageTableInstalled;
use crate::settings::FieldCase;
use crate::violation::Violation;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, OnceLock};

/// Template used for tags missing from the table.
pub const FALLBACK_TEMPLATE: &str = "{field} is invalid";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    // Core
    ("required", "{field} is required"),
    ("omitempty", "{field} is optional"),
    // Length
    ("min", "{field} must be at least {param} characters"),
    ("max", "{field} must be at most {param} characters"),
    ("len", "{field} must be exactly {param} characters"),
    // String content
    ("alpha", "{field} must contain only letters"),
    ("alphanum", "{field} must contain only letters and numbers"),
    ("alphanumunicode", "{field} must contain only letters and numbers"),
    ("lowercase", "{field} must be lowercase"),
    ("uppercase", "{field} must be uppercase"),
    ("contains", "{field} must contain {param}"),
    ("containsany", "{field} must contain one of {param}"),
    ("excludes", "{field} must not contain {param}"),
    ("startswith", "{field} must start with {param}"),
    ("endswith", "{field} must end with {param}"),
    ("hexadecimal", "{field} must be a valid hexadecimal"),
    // Format
    ("email", "{field} is not a valid email"),
    ("url", "{field} is not a valid URL"),
    ("uri", "{field} is not a valid URI"),
    ("uuid", "{field} must be a valid UUID"),
    ("uuid4", "{field} must be a valid UUID"),
    ("uuid5", "{field} must be a valid UUID"),
    ("ip", "{field} must be a valid IP address"),
    ("ipv4", "{field} must be a valid IPv4 address"),
    ("ipv6", "{field} must be a valid IPv6 address"),
    ("hostname", "{field} must be a valid hostname"),
    // Numbers
    ("gt", "{field} must be greater than {param}"),
    ("gte", "{field} must be greater than or equal to {param}"),
    ("lt", "{field} must be less than {param}"),
    ("lte", "{field} must be less than or equal to {param}"),
    ("eq", "{field} must be equal to {param}"),
    ("ne", "{field} must not be equal to {param}"),
    // Time
    ("datetime", "{field} must be a valid datetime"),
    // Collections
    ("unique", "{field} must contain unique values"),
    ("dive", "{field} contains an invalid value"),
    // Cross-field and conditional
    ("eqfield", "{field} must be equal to {param}"),
    ("nefield", "{field} must not be equal to {param}"),
    ("required_if", "{field} is required"),
    ("required_with", "{field} is required"),
    ("required_with_all", "{field} is required"),
    ("required_without", "{field} is required"),
    ("required_without_all", "{field} is required"),
    // Enumerations
    ("oneof", "{field} must be one of {param}"),
];

/// Immutable mapping from constraint tag to message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTable {
    templates: BTreeMap<Cow<'static, str>, Cow<'static, str>>,
    fallback: Cow<'static, str>,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES
                .iter()
                .map(|(tag, template)| (Cow::Borrowed(*tag), Cow::Borrowed(*template)))
                .collect(),
            fallback: Cow::Borrowed(FALLBACK_TEMPLATE),
        }
    }
}

impl MessageTable {
    /// Replace (or add) the template for `tag`.
    #[must_use]
    pub fn with_override(
        mut self,
        tag: impl Into<Cow<'static, str>>,
        template: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.templates.insert(tag.into(), template.into());
        self
    }

    /// Apply several overrides at once.
    #[must_use]
    pub fn with_overrides<I, K, V>(self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<Cow<'static, str>>,
    {
        overrides
            .into_iter()
            .fold(self, |table, (tag, template)| table.with_override(tag, template))
    }

    /// Replace the template used for unknown tags.
    #[must_use]
    pub fn with_fallback(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.fallback = template.into();
        self
    }

    /// Template registered for `tag`, if any.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.templates.get(tag).map(|template| &**template)
    }

    /// Template for `tag`, or the fallback template.
    #[must_use]
    pub fn template(&self, tag: &str) -> &str {
        self.get(tag).unwrap_or(&*self.fallback)
    }

    /// Template used for unknown tags.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Registered templates, ordered by tag.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates
            .iter()
            .map(|(tag, template)| (&**tag, &**template))
    }

    /// Number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true when no templates are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render one violation.
    #[must_use]
    pub fn render(&self, violation: &Violation, case: FieldCase) -> String {
        render_with(self.template(violation.tag()), violation, case)
    }

    /// Render every violation, preserving order.
    #[must_use]
    pub fn render_all(&self, violations: &[Violation], case: FieldCase) -> Vec<String> {
        violations
            .iter()
            .map(|violation| self.render(violation, case))
            .collect()
    }
}

/// Render one violation through an explicit template.
pub(crate) fn render_with(template: &str, violation: &Violation, case: FieldCase) -> String {
    render_template(
        template,
        &case.apply(violation.field()),
        violation.param().unwrap_or_default(),
    )
}

/// Substitute `{field}` and `{param}` in a single left-to-right pass.
///
/// Substituted text is never rescanned, so placeholders inside a field name
/// or parameter are emitted literally.
fn render_template(template: &str, field: &str, param: &str) -> String {
    let mut rendered = String::with_capacity(template.len() + field.len() + param.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let (head, tail) = rest.split_at(start);
        rendered.push_str(head);
        if let Some(after) = tail.strip_prefix("{field}") {
            rendered.push_str(field);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{param}") {
            rendered.push_str(param);
            rest = after;
        } else {
            rendered.push('{');
            rest = tail.get(1..).unwrap_or_default();
        }
    }
    rendered.push_str(rest);
    rendered
}

static BUILTIN_TABLE: LazyLock<Arc<MessageTable>> =
    LazyLock::new(|| Arc::new(MessageTable::default()));

static INSTALLED_TABLE: OnceLock<Arc<MessageTable>> = OnceLock::new();

/// Install the process-wide message table.
///
/// Call once at startup, before the first validation; the table is
/// read-only afterwards.
pub fn install_message_table(table: MessageTable) -> Result<(), MessageTableInstalled> {
    INSTALLED_TABLE
        .set(Arc::new(table))
        .map_err(|_| MessageTableInstalled)
}

/// Process-wide message table: the installed one, or the built-in default.
#[must_use]
pub fn message_table() -> Arc<MessageTable> {
    INSTALLED_TABLE
        .get()
        .map_or_else(|| Arc::clone(&*BUILTIN_TABLE), Arc::clone)
}

/// Render violations with the process-wide table and lowercase field names.
#[must_use]
pub fn format_violations(violations: &[Violation]) -> Vec<String> {
    message_table().render_all(violations, FieldCase::Lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    fn violation(field: &str, tag: &str, param: Option<&str>) -> Violation {
        Violation::new(field, field, tag, param)
    }

    #[test]
    fn every_builtin_kind_has_a_template() {
        let table = MessageTable::default();
        for kind in RuleKind::ALL {
            assert!(table.get(kind.tag()).is_some(), "missing template for {kind}");
        }
    }

    #[test]
    fn renders_field_and_param() {
        let table = MessageTable::default();
        assert_eq!(
            table.render(&violation("Field", "min", Some("3")), FieldCase::Lower),
            "field must be at least 3 characters"
        );
        assert_eq!(
            table.render(&violation("Age", "gte", Some("18")), FieldCase::Lower),
            "age must be greater than or equal to 18"
        );
        assert_eq!(
            table.render(&violation("Role", "oneof", Some("admin user")), FieldCase::AsDeclared),
            "Role must be one of admin user"
        );
    }

    #[test]
    fn surplus_params_are_ignored() {
        let table = MessageTable::default();
        assert_eq!(
            table.render(&violation("name", "required", Some("ignored")), FieldCase::Lower),
            "name is required"
        );
    }

    #[test]
    fn unknown_tags_use_the_fallback() {
        let table = MessageTable::default();
        assert_eq!(
            table.render(&violation("Slug", "slug_format", None), FieldCase::Lower),
            "slug is invalid"
        );
        let table = table.with_fallback("{field}: rejected");
        assert_eq!(
            table.render(&violation("slug", "slug_format", None), FieldCase::Lower),
            "slug: rejected"
        );
    }

    #[test]
    fn overrides_replace_builtin_templates() {
        let table = MessageTable::default()
            .with_overrides([("required", "please provide {field}"), ("slug", "{field} is not a slug")]);
        assert_eq!(
            table.render(&violation("email", "required", None), FieldCase::Lower),
            "please provide email"
        );
        assert_eq!(table.template("slug"), "{field} is not a slug");
    }

    #[test]
    fn substitution_is_single_pass() {
        assert_eq!(render_template("{field} vs {param}", "{param}", "x"), "{param} vs x");
        assert_eq!(render_template("{other} {field}", "a", ""), "{other} a");
        assert_eq!(render_template("trailing {", "a", ""), "trailing {");
    }

    #[test]
    fn process_table_defaults_to_builtin() {
        let messages = format_violations(&[violation("Name", "required", None)]);
        assert_eq!(messages, vec!["name is required".to_string()]);
    }
}
