//! Property tests for message rendering and joining.

use dtoguard_validation::{FieldSpec, PayloadError, PayloadSchema};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn schema(fields: usize) -> PayloadSchema {
    (0..fields).fold(PayloadSchema::new("generated"), |schema, index| {
        schema.field(FieldSpec::new(format!("field{index}")).flag("required"))
    })
}

proptest! {
    #[test]
    fn one_segment_per_violation(fields in 1_usize..12, present in proptest::collection::vec(any::<bool>(), 12)) {
        let mut object = Map::new();
        for (index, filled) in present.iter().take(fields).enumerate() {
            if *filled {
                object.insert(format!("field{index}"), Value::String("x".to_string()));
            }
        }
        let missing = present.iter().take(fields).filter(|filled| !**filled).count();

        match schema(fields).validate_json(&Value::Object(object)) {
            Ok(()) => prop_assert_eq!(missing, 0),
            Err(PayloadError::Constraint { message, violations }) => {
                prop_assert_eq!(violations.len(), missing);
                let segments: Vec<&str> = message.split(", ").collect();
                prop_assert_eq!(segments.len(), missing);
                prop_assert!(!message.starts_with(", "));
                prop_assert!(!message.ends_with(", "));
                for segment in segments {
                    prop_assert!(segment.ends_with(" is required"));
                }
            },
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn non_objects_never_reach_constraint_checks(number in any::<i64>(), text in ".*") {
        let schema = schema(3);
        prop_assert_eq!(schema.validate_json(&Value::from(number)), Err(PayloadError::InvalidPayload));
        prop_assert_eq!(schema.validate_json(&Value::String(text)), Err(PayloadError::InvalidPayload));
    }
}
