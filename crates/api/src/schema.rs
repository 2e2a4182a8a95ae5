//! JSON Schema exports for the reusable DTOs and the response envelope.

use crate::dto::{ObjectIdParam, Pagination, SlugParam, UuidParam};
use crate::response::MessageResponse;
use schemars::{Schema, schema_for};

/// JSON Schema for `UuidParam`.
#[must_use]
pub fn uuid_param_schema() -> Schema {
    schema_for!(UuidParam)
}

/// JSON Schema for `ObjectIdParam`.
#[must_use]
pub fn object_id_param_schema() -> Schema {
    schema_for!(ObjectIdParam)
}

/// JSON Schema for `SlugParam`.
#[must_use]
pub fn slug_param_schema() -> Schema {
    schema_for!(SlugParam)
}

/// JSON Schema for `Pagination`.
#[must_use]
pub fn pagination_schema() -> Schema {
    schema_for!(Pagination)
}

/// JSON Schema for an envelope without a body.
#[must_use]
pub fn message_response_schema() -> Schema {
    schema_for!(MessageResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property_names(schema: &Schema) -> Vec<String> {
        let mut names: Vec<String> = schema
            .get("properties")
            .and_then(serde_json::Value::as_object)
            .map(|properties| properties.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    #[test]
    fn normalized_fields_are_not_part_of_the_wire_format() {
        assert_eq!(property_names(&uuid_param_schema()), vec!["id"]);
        assert_eq!(property_names(&object_id_param_schema()), vec!["id"]);
    }

    #[test]
    fn pagination_exposes_page_and_limit() {
        assert_eq!(property_names(&pagination_schema()), vec!["limit", "page"]);
        assert_eq!(property_names(&slug_param_schema()), vec!["slug"]);
    }

    #[test]
    fn envelope_schema_lists_its_fields() {
        let names = property_names(&message_response_schema());
        for field in ["code", "status", "message"] {
            assert!(names.iter().any(|name| name == field), "missing {field}");
        }
    }
}
