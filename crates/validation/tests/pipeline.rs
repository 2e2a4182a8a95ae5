//! End-to-end behavior of the validation pipeline on derived payloads.

use dtoguard_validation::{
    FieldCase, FieldValue, FormatViolations, FormatterError, INVALID_PAYLOAD_MESSAGE,
    MessageTable, Normalize, Payload, PayloadError, Validator, ValidatorSettings, Violation,
    validate_dto, validate_ref,
};
use std::error::Error;

#[derive(Debug, Clone, PartialEq, Payload)]
struct Signup {
    #[validate(required)]
    name: String,
    #[validate(gte = 18)]
    age: u32,
}

#[derive(Debug, Payload)]
struct Code {
    #[validate(min = 3)]
    field: String,
}

#[derive(Debug, Payload)]
#[validate(messages)]
struct Strict {
    #[validate(required)]
    name: String,
    #[validate(rules = "omitempty,email")]
    email: String,
}

impl FormatViolations for Strict {
    fn format_violations(&self, _violations: &[Violation]) -> Result<Vec<String>, FormatterError> {
        Ok(vec!["custom msg".to_string()])
    }
}

#[derive(Debug, Payload)]
#[validate(messages)]
struct Localized {
    #[validate(required, field = "Title")]
    title: String,
}

impl FormatViolations for Localized {
    fn format_violations(&self, violations: &[Violation]) -> Result<Vec<String>, FormatterError> {
        Err(FormatterError::new(format!(
            "no translation for {}",
            violations.first().map_or("?", Violation::field)
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Payload)]
#[validate(normalize)]
struct Handle {
    #[validate(required, min = 3, max = 20)]
    raw: String,
    canonical: Option<String>,
}

impl Normalize for Handle {
    fn normalize(mut self) -> Self {
        self.canonical = Some(self.raw.trim().to_lowercase());
        self
    }
}

#[derive(Debug, Payload)]
struct Address {
    #[validate(required)]
    city: String,
    #[validate(len = 5)]
    zip: String,
}

#[derive(Debug, Payload)]
struct Customer {
    #[validate(nested)]
    address: Address,
    #[validate(required, dive, min = 2)]
    tags: Vec<String>,
    #[validate(dive)]
    previous: Vec<Address>,
}

fn signup(name: &str, age: u32) -> Signup {
    Signup {
        name: name.to_string(),
        age,
    }
}

#[test]
fn violations_are_rendered_in_declaration_order() -> Result<(), Box<dyn Error>> {
    let rejection = validate_dto(Some(signup("", 17)))
        .err()
        .ok_or("expected a rejection")?;
    assert_eq!(
        rejection.error().to_string(),
        "name is required, age must be greater than or equal to 18"
    );
    assert_eq!(rejection.error().violations().len(), 2);
    assert_eq!(rejection.payload(), Some(&signup("", 17)));
    Ok(())
}

#[test]
fn parameterized_templates_carry_the_bound() -> Result<(), Box<dyn Error>> {
    let rejection = validate_dto(Some(Code {
        field: "ab".to_string(),
    }))
    .err()
    .ok_or("expected a rejection")?;
    assert_eq!(rejection.to_string(), "field must be at least 3 characters");
    Ok(())
}

#[test]
fn custom_formatter_replaces_default_messages() -> Result<(), Box<dyn Error>> {
    for payload in [
        Strict {
            name: String::new(),
            email: String::new(),
        },
        Strict {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
        },
    ] {
        let error = validate_dto(Some(payload))
            .err()
            .ok_or("expected a rejection")?
            .into_error();
        assert_eq!(error.to_string(), "custom msg");
        assert_eq!(error.violations().len(), 1);
    }
    Ok(())
}

#[test]
fn formatter_failure_supersedes_the_violations() -> Result<(), Box<dyn Error>> {
    let error = validate_dto(Some(Localized {
        title: String::new(),
    }))
    .err()
    .ok_or("expected a rejection")?
    .into_error();
    assert_eq!(
        error,
        PayloadError::Formatter(FormatterError::new("no translation for Title"))
    );
    assert_eq!(error.to_string(), "no translation for Title");
    Ok(())
}

#[test]
fn missing_payload_is_the_shape_error() -> Result<(), Box<dyn Error>> {
    let rejection = validate_dto::<Signup>(None)
        .err()
        .ok_or("expected a rejection")?;
    assert!(rejection.payload().is_none());
    assert_eq!(rejection.to_string(), INVALID_PAYLOAD_MESSAGE);
    assert!(rejection.error().is_invalid_payload());
    Ok(())
}

#[test]
fn valid_payloads_come_back_unchanged_without_normalizer() -> Result<(), Box<dyn Error>> {
    let payload = signup("Ada", 36);
    assert_eq!(validate_dto(Some(payload.clone()))?, payload);
    Ok(())
}

#[test]
fn normalizer_runs_only_after_success() -> Result<(), Box<dyn Error>> {
    let handle = validate_dto(Some(Handle {
        raw: " Ada_L ".to_string(),
        canonical: None,
    }))?;
    assert_eq!(handle.canonical.as_deref(), Some("ada_l"));

    let rejection = validate_dto(Some(Handle {
        raw: "ab".to_string(),
        canonical: None,
    }))
    .err()
    .ok_or("expected a rejection")?;
    assert_eq!(
        rejection.payload().map(|handle| handle.canonical.is_none()),
        Some(true)
    );
    Ok(())
}

#[test]
fn revalidating_a_normalized_payload_is_stable() -> Result<(), Box<dyn Error>> {
    let first = validate_dto(Some(Handle {
        raw: "Grace".to_string(),
        canonical: None,
    }))?;
    let second = validate_dto(Some(first.clone()))?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn nested_and_dived_fields_report_their_own_names() -> Result<(), Box<dyn Error>> {
    let customer = Customer {
        address: Address {
            city: String::new(),
            zip: "12345".to_string(),
        },
        tags: vec!["ok".to_string(), "x".to_string()],
        previous: vec![Address {
            city: "Lyon".to_string(),
            zip: "690".to_string(),
        }],
    };
    let error = validate_ref(&customer).err().ok_or("expected a rejection")?;
    let namespaces: Vec<&str> = error.violations().iter().map(Violation::namespace).collect();
    assert_eq!(namespaces, vec!["address.city", "tags[1]", "previous[0].zip"]);
    assert_eq!(
        error.to_string(),
        "city is required, tags[1] must be at least 2 characters, zip must be exactly 5 characters"
    );
    Ok(())
}

#[test]
fn validators_apply_their_own_settings_and_checks() -> Result<(), Box<dyn Error>> {
    #[derive(Debug, Payload)]
    struct Slug {
        #[validate(required, slug_format, field = "Slug")]
        value: String,
    }

    let mut settings = ValidatorSettings {
        separator: "; ".to_string(),
        field_case: FieldCase::AsDeclared,
        ..ValidatorSettings::default()
    };
    settings
        .messages
        .insert("slug_format".to_string(), "{field} must be kebab-case".to_string());
    let validator = Validator::new()
        .with_settings(settings)
        .with_check("slug_format", |value: &FieldValue<'_>, _param: Option<&str>| {
            value
                .as_str()
                .is_some_and(|text| text.chars().all(|ch| ch.is_ascii_lowercase() || ch == '-'))
        });

    validator.check(&Slug {
        value: "hello-world".to_string(),
    })?;
    let error = validator
        .check(&Slug {
            value: "Hello World".to_string(),
        })
        .err()
        .ok_or("expected a rejection")?;
    assert_eq!(error.to_string(), "Slug must be kebab-case");

    let error = validator
        .check(&Slug {
            value: String::new(),
        })
        .err()
        .ok_or("expected a rejection")?;
    assert_eq!(error.to_string(), "Slug is required");
    Ok(())
}

#[test]
fn validators_can_carry_their_own_table() -> Result<(), Box<dyn Error>> {
    let validator = Validator::new()
        .with_table(MessageTable::default().with_override("required", "{field} cannot be blank"));
    let error = validator
        .validate(Some(signup("", 20)))
        .err()
        .ok_or("expected a rejection")?;
    assert_eq!(error.to_string(), "name cannot be blank");
    Ok(())
}

#[test]
fn unregistered_custom_tags_fall_back_to_is_invalid() -> Result<(), Box<dyn Error>> {
    #[derive(Debug, Payload)]
    struct Sku {
        #[validate(sku_format)]
        sku: String,
    }

    let error = validate_ref(&Sku {
        sku: "AB-1".to_string(),
    })
    .err()
    .ok_or("expected a rejection")?;
    assert_eq!(error.to_string(), "sku is invalid");
    Ok(())
}

#[derive(Debug, Payload)]
struct Register {
    password: String,
    #[validate(required, eqfield = "password")]
    confirm: String,
}

#[derive(Debug, Payload)]
struct Contact {
    email: String,
    #[validate(required_without = "email")]
    phone: String,
    #[validate(required_with = "email", min = 5)]
    fax: String,
}

#[test]
fn cross_field_rules_read_siblings_without_rules() -> Result<(), Box<dyn Error>> {
    validate_ref(&Register {
        password: "secret".to_string(),
        confirm: "secret".to_string(),
    })?;

    let error = validate_ref(&Register {
        password: "secret".to_string(),
        confirm: "secret2".to_string(),
    })
    .err()
    .ok_or("expected a rejection")?;
    assert_eq!(error.to_string(), "confirm must be equal to password");
    Ok(())
}

#[test]
fn conditional_requirements_see_unannotated_siblings() -> Result<(), Box<dyn Error>> {
    let error = validate_ref(&Contact {
        email: "a@b.co".to_string(),
        phone: String::new(),
        fax: String::new(),
    })
    .err()
    .ok_or("expected a rejection")?;
    assert_eq!(error.to_string(), "fax is required");

    validate_ref(&Contact {
        email: "a@b.co".to_string(),
        phone: String::new(),
        fax: "55501".to_string(),
    })?;

    let error = validate_ref(&Contact {
        email: String::new(),
        phone: String::new(),
        fax: String::new(),
    })
    .err()
    .ok_or("expected a rejection")?;
    assert_eq!(error.to_string(), "phone is required");
    Ok(())
}
