//! Field values as seen by constraint checks.

use crate::payload::Payload;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A borrowed view of one payload field.
#[derive(Clone)]
pub enum FieldValue<'a> {
    /// Missing value (`None`, JSON `null`, absent JSON key).
    Absent,
    /// Text.
    Str(Cow<'a, str>),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating-point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Sequence of values.
    List(Vec<FieldValue<'a>>),
    /// Opaque map-like value; only its entry count is observable.
    Object {
        /// Number of entries.
        entries: usize,
    },
    /// Nested payload validated recursively.
    Nested(&'a dyn Payload),
}

impl<'a> FieldValue<'a> {
    /// Convert a JSON value.
    #[must_use]
    pub fn from_json(value: &'a serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Absent,
            serde_json::Value::Bool(flag) => Self::Bool(*flag),
            serde_json::Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    Self::Int(value)
                } else if let Some(value) = number.as_u64() {
                    Self::UInt(value)
                } else {
                    number.as_f64().map_or(Self::Absent, Self::Float)
                }
            },
            serde_json::Value::String(text) => Self::Str(Cow::Borrowed(text.as_str())),
            serde_json::Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(map) => Self::Object {
                entries: map.len(),
            },
        }
    }

    /// Returns true for the zero value of the field's type.
    ///
    /// Nested payloads are never zero; their presence is enough.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Str(text) => text.is_empty(),
            Self::Int(value) => *value == 0,
            Self::UInt(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
            Self::Bool(flag) => !flag,
            Self::List(items) => items.is_empty(),
            Self::Object { .. } | Self::Nested(_) => false,
        }
    }

    /// Text content, for string values only.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(&**text),
            _ => None,
        }
    }

    /// Numeric content, for number values only.
    #[must_use]
    pub(crate) fn number(&self) -> Option<Number> {
        match self {
            Self::Int(value) => Some(Number::Int(i128::from(*value))),
            Self::UInt(value) => Some(Number::Int(i128::from(*value))),
            Self::Float(value) => Some(Number::Float(*value)),
            _ => None,
        }
    }

    /// Quantity compared by bound rules: character count for text, length
    /// for collections, the value itself for numbers.
    #[must_use]
    pub(crate) fn magnitude(&self) -> Option<Number> {
        match self {
            Self::Str(text) => Some(Number::from_len(text.chars().count())),
            Self::List(items) => Some(Number::from_len(items.len())),
            Self::Object { entries } => Some(Number::from_len(*entries)),
            _ => self.number(),
        }
    }

    /// Textual rendering used by `oneof` and `required_if`.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Str(text) => Some(text.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::UInt(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Absent | Self::List(_) | Self::Object { .. } | Self::Nested(_) => None,
        }
    }

    /// Equality across compatible representations (e.g. `Int` and `UInt`).
    #[must_use]
    pub fn loosely_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(left), Self::Str(right)) => left == right,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::List(left), Self::List(right)) => {
                left.len() == right.len()
                    && left.iter().zip(right).all(|(left, right)| left.loosely_eq(right))
            },
            (Self::Absent, Self::Absent) => true,
            _ => match (self.number(), other.number()) {
                (Some(left), Some(right)) => left.compare(right) == Some(Ordering::Equal),
                _ => false,
            },
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => formatter.write_str("Absent"),
            Self::Str(text) => formatter.debug_tuple("Str").field(text).finish(),
            Self::Int(value) => formatter.debug_tuple("Int").field(value).finish(),
            Self::UInt(value) => formatter.debug_tuple("UInt").field(value).finish(),
            Self::Float(value) => formatter.debug_tuple("Float").field(value).finish(),
            Self::Bool(flag) => formatter.debug_tuple("Bool").field(flag).finish(),
            Self::List(items) => formatter.debug_tuple("List").field(items).finish(),
            Self::Object { entries } => formatter
                .debug_struct("Object")
                .field("entries", entries)
                .finish(),
            Self::Nested(payload) => formatter
                .debug_tuple("Nested")
                .field(&payload.type_name())
                .finish(),
        }
    }
}

/// Numeric quantity with integer precision where possible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(value) = text.parse::<i128>() {
            return Some(Self::Int(value));
        }
        text.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Self::Float)
    }

    fn from_len(len: usize) -> Self {
        Self::Int(i128::try_from(len).unwrap_or(i128::MAX))
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "mixed int/float comparisons tolerate f64 rounding"
    )]
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    pub(crate) fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => Some(left.cmp(&right)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

/// Expose a field to constraint checks.
///
/// Implemented for common scalar, text and collection types; the `Payload`
/// derive implements it for the deriving struct so nested payloads are
/// walked recursively.
pub trait AsFieldValue {
    /// Borrow the value for checking.
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Borrowed(self))
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Borrowed(self.as_str()))
    }
}

impl AsFieldValue for Cow<'_, str> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Borrowed(&**self))
    }
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

macro_rules! signed_field_value {
    ($($ty:ty),*) => {
        $(
            impl AsFieldValue for $ty {
                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::Int(i64::from(*self))
                }
            }
        )*
    };
}

macro_rules! unsigned_field_value {
    ($($ty:ty),*) => {
        $(
            impl AsFieldValue for $ty {
                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::UInt(u64::from(*self))
                }
            }
        )*
    };
}

signed_field_value!(i8, i16, i32, i64);
unsigned_field_value!(u8, u16, u32, u64);

impl AsFieldValue for isize {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Int(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl AsFieldValue for usize {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::UInt(u64::try_from(*self).unwrap_or(u64::MAX))
    }
}

impl AsFieldValue for f32 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(f64::from(*self))
    }
}

impl AsFieldValue for f64 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(*self)
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Box<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        self.as_ref()
            .map_or(FieldValue::Absent, AsFieldValue::as_field_value)
    }
}

impl<T: AsFieldValue> AsFieldValue for [T] {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::List(self.iter().map(AsFieldValue::as_field_value).collect())
    }
}

impl<T: AsFieldValue> AsFieldValue for Vec<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        self.as_slice().as_field_value()
    }
}

impl<K, V> AsFieldValue for BTreeMap<K, V> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Object {
            entries: self.len(),
        }
    }
}

impl<K, V, S> AsFieldValue for HashMap<K, V, S> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Object {
            entries: self.len(),
        }
    }
}

impl AsFieldValue for serde_json::Value {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::from_json(self)
    }
}

impl AsFieldValue for uuid::Uuid {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Owned(self.hyphenated().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_values_follow_type_defaults() {
        assert!(FieldValue::Absent.is_zero());
        assert!("".as_field_value().is_zero());
        assert!(0_i32.as_field_value().is_zero());
        assert!(0.0_f64.as_field_value().is_zero());
        assert!(false.as_field_value().is_zero());
        assert!(Vec::<String>::new().as_field_value().is_zero());
        assert!(Option::<u8>::None.as_field_value().is_zero());
        assert!(!Some(3_u8).as_field_value().is_zero());
        assert!(!FieldValue::Object { entries: 0 }.is_zero());
    }

    #[test]
    fn magnitude_counts_characters_not_bytes() {
        let value = "héllo".as_field_value();
        assert_eq!(value.magnitude(), Some(Number::Int(5)));
        let items = vec![1_u8, 2, 3];
        let list = items.as_field_value();
        assert_eq!(list.magnitude(), Some(Number::Int(3)));
    }

    #[test]
    fn json_values_convert_by_kind() {
        let value = json!({"a": 1, "b": [true, null], "c": "x", "d": -2, "e": 1.5});
        let Some(map) = value.as_object() else {
            return;
        };
        assert!(matches!(
            map.get("a").map(FieldValue::from_json),
            Some(FieldValue::Int(1))
        ));
        assert!(matches!(
            map.get("d").map(FieldValue::from_json),
            Some(FieldValue::Int(-2))
        ));
        assert!(matches!(
            map.get("e").map(FieldValue::from_json),
            Some(FieldValue::Float(_))
        ));
        assert!(matches!(FieldValue::from_json(&value), FieldValue::Object { entries: 5 }));
        let Some(list) = map.get("b").map(FieldValue::from_json) else {
            return;
        };
        assert!(matches!(list, FieldValue::List(ref items) if items.len() == 2));
    }

    #[test]
    fn loose_equality_crosses_integer_kinds() {
        assert!(FieldValue::Int(5).loosely_eq(&FieldValue::UInt(5)));
        assert!(FieldValue::Int(5).loosely_eq(&FieldValue::Float(5.0)));
        assert!(!FieldValue::Int(5).loosely_eq(&"5".as_field_value()));
        assert!("abc".as_field_value().loosely_eq(&String::from("abc").as_field_value()));
    }

    #[test]
    fn numbers_parse_with_integer_precision() {
        assert_eq!(Number::parse("18"), Some(Number::Int(18)));
        assert_eq!(Number::parse(" 2.5 "), Some(Number::Float(2.5)));
        assert_eq!(Number::parse("abc"), None);
        assert_eq!(Number::parse("NaN"), None);
        assert_eq!(
            Number::Int(9_007_199_254_740_993).compare(Number::Int(9_007_199_254_740_992)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn uuids_render_hyphenated() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            id.as_field_value().as_str(),
            Some("00000000-0000-0000-0000-000000000000")
        );
    }
}
