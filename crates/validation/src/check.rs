//! Rule evaluation.
//!
//! Fields are checked in declaration order and rules in declaration order.
//! The first failing rule of a field produces its only violation; `dive`
//! checks list elements individually and nested payloads are walked once
//! their own field passes.

use crate::formats;
use crate::payload::{Field, Payload};
use crate::rule::{Rule, RuleKind};
use crate::value::{FieldValue, Number};
use crate::violation::Violation;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Check registered for a custom tag: receives the value and the rule's
/// parameter, returns true when the value is acceptable.
pub type CustomCheck = Arc<dyn Fn(&FieldValue<'_>, Option<&str>) -> bool + Send + Sync>;

/// Custom checks keyed by tag.
pub type CustomChecks = BTreeMap<String, CustomCheck>;

pub struct Checker<'c> {
    custom: &'c CustomChecks,
}

impl<'c> Checker<'c> {
    pub const fn new(custom: &'c CustomChecks) -> Self {
        Self { custom }
    }

    /// Append the violations of `payload` to `out`.
    pub fn check_payload(
        &self,
        payload: &dyn Payload,
        prefix: Option<&str>,
        out: &mut Vec<Violation>,
    ) {
        let fields = payload.fields();
        for field in &fields {
            let namespace = match prefix {
                Some(prefix) => format!("{prefix}.{}", field.display),
                None => field.display.to_string(),
            };
            self.check_value(
                &field.value,
                field.rules,
                &Target {
                    display: field.display,
                    namespace: &namespace,
                },
                &fields,
                out,
            );
        }
    }

    fn check_value(
        &self,
        value: &FieldValue<'_>,
        rules: &[Rule],
        target: &Target<'_>,
        siblings: &[Field<'_>],
        out: &mut Vec<Violation>,
    ) {
        for (index, rule) in rules.iter().enumerate() {
            match rule.kind() {
                Some(RuleKind::OmitEmpty) => {
                    if value.is_zero() {
                        return;
                    }
                },
                Some(RuleKind::Required) => {
                    if value.is_zero() {
                        out.push(target.violation(rule));
                        return;
                    }
                },
                Some(kind) if kind.is_conditional() => {
                    let required = condition_holds(kind, rule.param(), siblings);
                    if value.is_zero() {
                        if required {
                            out.push(target.violation(rule));
                        }
                        return;
                    }
                },
                Some(RuleKind::Dive) => {
                    let FieldValue::List(items) = value else {
                        out.push(target.violation(rule));
                        return;
                    };
                    let remaining = rules.get(index + 1..).unwrap_or_default();
                    for (position, item) in items.iter().enumerate() {
                        let display = format!("{}[{position}]", target.display);
                        let namespace = format!("{}[{position}]", target.namespace);
                        let element = Target {
                            display: &display,
                            namespace: &namespace,
                        };
                        self.check_value(item, remaining, &element, siblings, out);
                    }
                    return;
                },
                kind => {
                    if !self.satisfies(kind, rule, value, siblings) {
                        out.push(target.violation(rule));
                        return;
                    }
                },
            }
        }

        if let FieldValue::Nested(payload) = value {
            self.check_payload(*payload, Some(target.namespace), out);
        }
    }

    fn satisfies(
        &self,
        kind: Option<RuleKind>,
        rule: &Rule,
        value: &FieldValue<'_>,
        siblings: &[Field<'_>],
    ) -> bool {
        let Some(kind) = kind else {
            return self
                .custom
                .get(rule.tag())
                .is_some_and(|check| check(value, rule.param()));
        };
        if matches!(value, FieldValue::Absent) {
            return false;
        }

        let param = rule.param();
        match kind {
            RuleKind::Min | RuleKind::Gte => bound(value, param, Ordering::is_ge),
            RuleKind::Max | RuleKind::Lte => bound(value, param, Ordering::is_le),
            RuleKind::Len => bound(value, param, Ordering::is_eq),
            RuleKind::Gt => bound(value, param, Ordering::is_gt),
            RuleKind::Lt => bound(value, param, Ordering::is_lt),
            RuleKind::Eq => equals_param(value, param) == Some(true),
            RuleKind::Ne => equals_param(value, param) == Some(false),
            RuleKind::Unique => is_unique(value),
            RuleKind::EqField => sibling(siblings, param.unwrap_or_default())
                .is_some_and(|other| value.loosely_eq(&other.value)),
            RuleKind::NeField => sibling(siblings, param.unwrap_or_default())
                .is_some_and(|other| !value.loosely_eq(&other.value)),
            RuleKind::OneOf => value.render().is_some_and(|rendered| {
                split_words(param.unwrap_or_default()).contains(&rendered.as_str())
            }),
            _ => value
                .as_str()
                .is_some_and(|text| text_satisfies(kind, text, param)),
        }
    }
}

struct Target<'t> {
    display: &'t str,
    namespace: &'t str,
}

impl Target<'_> {
    fn violation(&self, rule: &Rule) -> Violation {
        Violation::new(self.display, self.namespace, rule.tag(), rule.param())
    }
}

fn text_satisfies(kind: RuleKind, text: &str, param: Option<&str>) -> bool {
    let param_text = param.unwrap_or_default();
    match kind {
        RuleKind::Alpha => formats::is_alpha(text),
        RuleKind::AlphaNum => formats::is_alphanumeric(text),
        RuleKind::AlphaNumUnicode => formats::is_alphanumeric_unicode(text),
        RuleKind::Lowercase => formats::is_lowercase(text),
        RuleKind::Uppercase => formats::is_uppercase(text),
        RuleKind::Contains => text.contains(param_text),
        RuleKind::ContainsAny => param_text.chars().any(|ch| text.contains(ch)),
        RuleKind::Excludes => !text.contains(param_text),
        RuleKind::StartsWith => text.starts_with(param_text),
        RuleKind::EndsWith => text.ends_with(param_text),
        RuleKind::Hexadecimal => formats::is_hexadecimal(text),
        RuleKind::Email => formats::is_email(text),
        RuleKind::Url => formats::is_url(text),
        RuleKind::Uri => formats::is_uri(text),
        RuleKind::Uuid => formats::is_uuid(text, None),
        RuleKind::Uuid4 => formats::is_uuid(text, Some(4)),
        RuleKind::Uuid5 => formats::is_uuid(text, Some(5)),
        RuleKind::Ip => formats::is_ip(text),
        RuleKind::Ipv4 => formats::is_ipv4(text),
        RuleKind::Ipv6 => formats::is_ipv6(text),
        RuleKind::Hostname => formats::is_hostname(text),
        RuleKind::Datetime => formats::is_datetime(text, param),
        _ => false,
    }
}

/// Compare the value's magnitude against a numeric parameter.
///
/// A missing or unparseable parameter fails the rule.
fn bound(value: &FieldValue<'_>, param: Option<&str>, accept: fn(Ordering) -> bool) -> bool {
    let (Some(actual), Some(limit)) = (value.magnitude(), param.and_then(Number::parse)) else {
        return false;
    };
    actual.compare(limit).is_some_and(accept)
}

/// `Some(true)` when the value equals the parameter, `None` when the two
/// cannot be compared.
fn equals_param(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    let param = param?;
    match value {
        FieldValue::Str(text) => Some(text == param),
        FieldValue::Bool(flag) => param.trim().parse::<bool>().ok().map(|expected| *flag == expected),
        _ => {
            let actual = value.magnitude()?;
            let expected = Number::parse(param)?;
            actual.compare(expected).map(Ordering::is_eq)
        },
    }
}

fn is_unique(value: &FieldValue<'_>) -> bool {
    let FieldValue::List(items) = value else {
        return false;
    };
    items.iter().enumerate().all(|(index, item)| {
        items
            .iter()
            .skip(index + 1)
            .all(|other| !item.loosely_eq(other))
    })
}

fn sibling<'f, 'a>(siblings: &'f [Field<'a>], name: &str) -> Option<&'f Field<'a>> {
    siblings.iter().find(|field| field.answers_to(name.trim()))
}

/// Whether a conditional `required_*` rule makes the field mandatory.
fn condition_holds(kind: RuleKind, param: Option<&str>, siblings: &[Field<'_>]) -> bool {
    let names = split_words(param.unwrap_or_default());
    let present =
        |name: &str| sibling(siblings, name).is_some_and(|field| !field.value.is_zero());
    match kind {
        RuleKind::RequiredIf => {
            !names.is_empty()
                && names.chunks(2).all(|pair| match pair {
                    [name, expected] => sibling(siblings, name)
                        .and_then(|field| field.value.render())
                        .is_some_and(|actual| actual == *expected),
                    _ => false,
                })
        },
        RuleKind::RequiredWith => names.iter().any(|name| present(name)),
        RuleKind::RequiredWithAll => !names.is_empty() && names.iter().all(|name| present(name)),
        RuleKind::RequiredWithout => names.iter().any(|name| !present(name)),
        RuleKind::RequiredWithoutAll => {
            !names.is_empty() && names.iter().all(|name| !present(name))
        },
        _ => false,
    }
}

/// Split a parameter on whitespace; single-quoted words may contain spaces.
pub fn split_words(param: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut rest = param.trim_start();
    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('\'') {
            let end = quoted.find('\'').unwrap_or(quoted.len());
            words.push(quoted.get(..end).unwrap_or_default());
            rest = quoted.get(end + 1..).unwrap_or_default().trim_start();
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            words.push(rest.get(..end).unwrap_or_default());
            rest = rest.get(end..).unwrap_or_default().trim_start();
        }
    }
    words
}
