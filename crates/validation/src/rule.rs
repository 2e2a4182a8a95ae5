//! Constraint declarations attached to payload fields.

use crate::error::RuleParseError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Constraint kinds understood by the built-in checks.
///
/// Tags outside this list are still accepted by [`Rule`]; they resolve to
/// `None` from [`RuleKind::from_tag`] and are evaluated through checks
/// registered on a [`crate::Validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    /// Value must be present and non-zero.
    Required,
    /// Skip the remaining rules when the value is zero.
    OmitEmpty,
    /// Lower bound (length for strings and lists, value for numbers).
    Min,
    /// Upper bound (length for strings and lists, value for numbers).
    Max,
    /// Exact length (or exact value for numbers).
    Len,
    /// ASCII letters only.
    Alpha,
    /// ASCII letters and digits only.
    AlphaNum,
    /// Unicode letters and digits only.
    AlphaNumUnicode,
    /// No uppercase characters.
    Lowercase,
    /// No lowercase characters.
    Uppercase,
    /// Contains the parameter as a substring.
    Contains,
    /// Contains at least one character of the parameter.
    ContainsAny,
    /// Does not contain the parameter.
    Excludes,
    /// Starts with the parameter.
    StartsWith,
    /// Ends with the parameter.
    EndsWith,
    /// Hexadecimal digits, optionally `0x`-prefixed.
    Hexadecimal,
    /// E-mail address.
    Email,
    /// Absolute URL with a host.
    Url,
    /// Any parseable URI.
    Uri,
    /// Hyphenated UUID of any version.
    Uuid,
    /// Hyphenated version 4 UUID.
    Uuid4,
    /// Hyphenated version 5 UUID.
    Uuid5,
    /// IPv4 or IPv6 address.
    Ip,
    /// IPv4 address.
    Ipv4,
    /// IPv6 address.
    Ipv6,
    /// RFC 952 hostname.
    Hostname,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Equal to the parameter.
    Eq,
    /// Not equal to the parameter.
    Ne,
    /// Date/time in the parameter's layout (RFC 3339 without one).
    Datetime,
    /// List elements are pairwise distinct.
    Unique,
    /// Apply the remaining rules to each list element.
    Dive,
    /// Equal to the sibling field named by the parameter.
    EqField,
    /// Not equal to the sibling field named by the parameter.
    NeField,
    /// Required when a sibling holds a given value.
    RequiredIf,
    /// Required when any listed sibling is present.
    RequiredWith,
    /// Required when all listed siblings are present.
    RequiredWithAll,
    /// Required when any listed sibling is absent.
    RequiredWithout,
    /// Required when all listed siblings are absent.
    RequiredWithoutAll,
    /// One of the space-separated alternatives.
    OneOf,
}

impl RuleKind {
    /// Every built-in kind, in message-table order.
    pub const ALL: &'static [Self] = &[
        Self::Required,
        Self::OmitEmpty,
        Self::Min,
        Self::Max,
        Self::Len,
        Self::Alpha,
        Self::AlphaNum,
        Self::AlphaNumUnicode,
        Self::Lowercase,
        Self::Uppercase,
        Self::Contains,
        Self::ContainsAny,
        Self::Excludes,
        Self::StartsWith,
        Self::EndsWith,
        Self::Hexadecimal,
        Self::Email,
        Self::Url,
        Self::Uri,
        Self::Uuid,
        Self::Uuid4,
        Self::Uuid5,
        Self::Ip,
        Self::Ipv4,
        Self::Ipv6,
        Self::Hostname,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Eq,
        Self::Ne,
        Self::Datetime,
        Self::Unique,
        Self::Dive,
        Self::EqField,
        Self::NeField,
        Self::RequiredIf,
        Self::RequiredWith,
        Self::RequiredWithAll,
        Self::RequiredWithout,
        Self::RequiredWithoutAll,
        Self::OneOf,
    ];

    /// Resolve a tag into a built-in kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "required" => Self::Required,
            "omitempty" => Self::OmitEmpty,
            "min" => Self::Min,
            "max" => Self::Max,
            "len" => Self::Len,
            "alpha" => Self::Alpha,
            "alphanum" => Self::AlphaNum,
            "alphanumunicode" => Self::AlphaNumUnicode,
            "lowercase" => Self::Lowercase,
            "uppercase" => Self::Uppercase,
            "contains" => Self::Contains,
            "containsany" => Self::ContainsAny,
            "excludes" => Self::Excludes,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "hexadecimal" => Self::Hexadecimal,
            "email" => Self::Email,
            "url" => Self::Url,
            "uri" => Self::Uri,
            "uuid" => Self::Uuid,
            "uuid4" => Self::Uuid4,
            "uuid5" => Self::Uuid5,
            "ip" => Self::Ip,
            "ipv4" => Self::Ipv4,
            "ipv6" => Self::Ipv6,
            "hostname" => Self::Hostname,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "datetime" => Self::Datetime,
            "unique" => Self::Unique,
            "dive" => Self::Dive,
            "eqfield" => Self::EqField,
            "nefield" => Self::NeField,
            "required_if" => Self::RequiredIf,
            "required_with" => Self::RequiredWith,
            "required_with_all" => Self::RequiredWithAll,
            "required_without" => Self::RequiredWithout,
            "required_without_all" => Self::RequiredWithoutAll,
            "oneof" => Self::OneOf,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical tag for the kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::OmitEmpty => "omitempty",
            Self::Min => "min",
            Self::Max => "max",
            Self::Len => "len",
            Self::Alpha => "alpha",
            Self::AlphaNum => "alphanum",
            Self::AlphaNumUnicode => "alphanumunicode",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::Contains => "contains",
            Self::ContainsAny => "containsany",
            Self::Excludes => "excludes",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Hexadecimal => "hexadecimal",
            Self::Email => "email",
            Self::Url => "url",
            Self::Uri => "uri",
            Self::Uuid => "uuid",
            Self::Uuid4 => "uuid4",
            Self::Uuid5 => "uuid5",
            Self::Ip => "ip",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Hostname => "hostname",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Datetime => "datetime",
            Self::Unique => "unique",
            Self::Dive => "dive",
            Self::EqField => "eqfield",
            Self::NeField => "nefield",
            Self::RequiredIf => "required_if",
            Self::RequiredWith => "required_with",
            Self::RequiredWithAll => "required_with_all",
            Self::RequiredWithout => "required_without",
            Self::RequiredWithoutAll => "required_without_all",
            Self::OneOf => "oneof",
        }
    }

    /// Returns true when the kind cannot be evaluated without a parameter.
    #[must_use]
    pub const fn requires_param(self) -> bool {
        matches!(
            self,
            Self::Min
                | Self::Max
                | Self::Len
                | Self::Contains
                | Self::ContainsAny
                | Self::Excludes
                | Self::StartsWith
                | Self::EndsWith
                | Self::Gt
                | Self::Gte
                | Self::Lt
                | Self::Lte
                | Self::Eq
                | Self::Ne
                | Self::EqField
                | Self::NeField
                | Self::RequiredIf
                | Self::RequiredWith
                | Self::RequiredWithAll
                | Self::RequiredWithout
                | Self::RequiredWithoutAll
                | Self::OneOf
        )
    }

    /// Returns true for the conditional `required_*` family.
    #[must_use]
    pub const fn is_conditional(self) -> bool {
        matches!(
            self,
            Self::RequiredIf
                | Self::RequiredWith
                | Self::RequiredWithAll
                | Self::RequiredWithout
                | Self::RequiredWithoutAll
        )
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.tag())
    }
}

/// One declared constraint: a tag plus an optional parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    tag: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    param: Option<Cow<'static, str>>,
}

impl Rule {
    /// Build a rule from static text; usable in `const` contexts.
    #[must_use]
    pub const fn from_static(tag: &'static str, param: Option<&'static str>) -> Self {
        let param = match param {
            Some(param) => Some(Cow::Borrowed(param)),
            None => None,
        };
        Self {
            tag: Cow::Borrowed(tag),
            param,
        }
    }

    /// Build a parameterless rule.
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag: tag.into(),
            param: None,
        }
    }

    /// Build a rule with a parameter.
    pub fn with_param(
        tag: impl Into<Cow<'static, str>>,
        param: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            tag: tag.into(),
            param: Some(param.into()),
        }
    }

    /// Constraint tag (e.g. `min`).
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Constraint parameter (e.g. `3` for `min=3`).
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Built-in kind, or `None` for custom tags.
    #[must_use]
    pub fn kind(&self) -> Option<RuleKind> {
        RuleKind::from_tag(&self.tag)
    }

    /// Parse a comma-separated rule list such as `required,min=3,max=50`.
    ///
    /// Parameters run from the first `=` to the next comma, so they cannot
    /// themselves contain commas.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, RuleParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let mut rules = Vec::new();
        for (position, segment) in input.split(',').enumerate() {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(RuleParseError::EmptySegment { position });
            }
            let (tag, param) = match segment.split_once('=') {
                Some((tag, param)) => (tag.trim(), Some(param.trim())),
                None => (segment, None),
            };
            if tag.is_empty() {
                return Err(RuleParseError::EmptySegment { position });
            }
            let missing_param = param.is_none_or(str::is_empty);
            if missing_param && RuleKind::from_tag(tag).is_some_and(RuleKind::requires_param) {
                return Err(RuleParseError::MissingParam {
                    tag: tag.to_string(),
                });
            }
            rules.push(match param {
                Some(param) if !param.is_empty() => {
                    Self::with_param(tag.to_string(), param.to_string())
                },
                _ => Self::new(tag.to_string()),
            });
        }
        Ok(rules)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(formatter, "{}={param}", self.tag),
            None => formatter.write_str(&self.tag),
        }
    }
}
