//! Transport-agnostic request extraction.
//!
//! Each helper deserializes the raw input and then runs the validation
//! pipeline on the result. Both failures surface as bad requests.

use crate::error::ApiError;
use dtoguard_validation::{Payload, validate_dto};
use serde::de::value::{Error as ValueError, MapDeserializer};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use std::collections::BTreeMap;

/// Deserialize and validate a JSON request body.
pub fn parse_json_body<T>(body: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Payload,
{
    let payload = serde_json::from_str(body).map_err(|error| {
        tracing::debug!(error = %error, "request body did not deserialize");
        ApiError::bad_request(format!("invalid request body: {error}")).with_source(error)
    })?;
    validated(payload)
}

/// Deserialize and validate query-string parameters.
///
/// Values are strings; numeric, boolean, and unit-enum fields are parsed
/// from their text.
pub fn parse_query<T>(query: &BTreeMap<String, String>) -> Result<T, ApiError>
where
    T: DeserializeOwned + Payload,
{
    from_string_map(query, "query")
}

/// Deserialize and validate path parameters.
pub fn parse_params<T>(params: &BTreeMap<String, String>) -> Result<T, ApiError>
where
    T: DeserializeOwned + Payload,
{
    from_string_map(params, "path parameters")
}

/// Deserialize and validate request headers.
///
/// Header names are matched case-insensitively against lower-case field
/// names, so `X-Request-Id` fills a field renamed to `x-request-id`.
pub fn parse_headers<T>(headers: &BTreeMap<String, String>) -> Result<T, ApiError>
where
    T: DeserializeOwned + Payload,
{
    let lowered = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect();
    from_string_map(&lowered, "headers")
}

fn from_string_map<T>(map: &BTreeMap<String, String>, source: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Payload,
{
    let deserializer = MapDeserializer::new(
        map.iter()
            .map(|(key, value)| (key.as_str(), StrValue(value.as_str()))),
    );
    let payload = T::deserialize(deserializer).map_err(|error: ValueError| {
        tracing::debug!(source, error = %error, "request parameters did not deserialize");
        ApiError::bad_request(format!("invalid {source}: {error}")).with_source(error)
    })?;
    validated(payload)
}

fn validated<T: Payload>(payload: T) -> Result<T, ApiError> {
    validate_dto(Some(payload)).map_err(|rejection| ApiError::from(rejection.into_error()))
}

/// One textual parameter value, parsed on demand by the target field type.
#[derive(Debug, Clone, Copy)]
struct StrValue<'de>(&'de str);

macro_rules! parse_scalar {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                let value = self.0.trim().parse::<$ty>().map_err(|_| {
                    <Self::Error as de::Error>::invalid_value(
                        de::Unexpected::Str(self.0),
                        &stringify!($ty),
                    )
                })?;
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for StrValue<'de> {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_borrowed_str(self.0)
    }

    parse_scalar! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_enum(IntoDeserializer::<'de, ValueError>::into_deserializer(self.0))
    }

    serde::forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, ValueError> for StrValue<'de> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}
