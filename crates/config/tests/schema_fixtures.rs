//! Integration tests for loading schema fixtures from disk.

use dtoguard_config::{
    SchemaFile, ValidatorEnv, load_schema_from_path, parse_schema_file_json,
    parse_schema_file_toml, to_pretty_toml,
};
use dtoguard_shared::ErrorCode;
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

fn read_fixture(relative: &str) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(fixture_path(relative))?)
}

#[test]
fn json_and_toml_fixtures_describe_the_same_file() -> Result<(), Box<dyn Error>> {
    let from_json = parse_schema_file_json(&read_fixture("accounts.schema.json")?)?;
    let from_toml = parse_schema_file_toml(&read_fixture("accounts.schema.toml")?)?;

    assert_eq!(from_json.as_ref(), from_toml.as_ref());
    assert_eq!(
        from_json.payload_names().collect::<Vec<_>>(),
        vec!["page", "signup"]
    );
    Ok(())
}

#[test]
fn loaded_payloads_validate_json_input() -> Result<(), Box<dyn Error>> {
    let file = load_schema_from_path(
        Some(&fixture_path("accounts.schema.toml")),
        None,
        &ValidatorEnv::default(),
    )?;
    let signup = file.payload("signup")?;
    let validator = file.validator();

    signup.validate_json_with(
        &validator,
        &json!({"name": "Ada", "email": "ada@example.com", "role": "admin"}),
    )?;

    let error = signup
        .validate_json_with(
            &validator,
            &json!({"name": "Al", "email": "nope", "age": 12, "role": "root"}),
        )
        .err()
        .ok_or("expected a rejection")?;
    assert_eq!(
        error.to_string(),
        "name must be at least 3 characters, email is not a valid email, \
         age must be greater than or equal to 18, role must be one of admin user"
    );
    Ok(())
}

#[test]
fn env_fixture_overrides_file_settings() -> Result<(), Box<dyn Error>> {
    let env_map: BTreeMap<String, String> = serde_json::from_str(&read_fixture("env.valid.json")?)?;
    let env = ValidatorEnv::from_map(&env_map)?;
    let file = load_schema_from_path(Some(&fixture_path("accounts.schema.json")), None, &env)?;

    let error = file
        .payload("page")?
        .validate_json_with(&file.validator(), &json!({"page": 0, "limit": 5000}))
        .err()
        .ok_or("expected a rejection")?;
    assert_eq!(
        error.to_string(),
        "page is required; limit must be at most 1000 characters"
    );
    Ok(())
}

#[test]
fn invalid_env_fixture_is_rejected() -> Result<(), Box<dyn Error>> {
    let env_map: BTreeMap<String, String> = serde_json::from_str(&read_fixture("env.invalid.json")?)?;
    let error = ValidatorEnv::from_map(&env_map)
        .err()
        .ok_or("expected an env error")?;
    let envelope = dtoguard_shared::ErrorEnvelope::from(error);
    assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env"));
    Ok(())
}

#[test]
fn missing_file_reports_read_failed() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.json");
    let error = load_schema_from_path(Some(&path), None, &ValidatorEnv::default())
        .err()
        .ok_or("expected a read failure")?;
    assert_eq!(error.code, ErrorCode::new("config", "read_failed"));
    assert_eq!(
        error.metadata.get("reason").map(String::as_str),
        Some("not_found")
    );
    Ok(())
}

#[test]
fn malformed_toml_reports_invalid_toml() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.toml");
    fs::write(&path, "version = \n")?;
    let error = load_schema_from_path(Some(&path), None, &ValidatorEnv::default())
        .err()
        .ok_or("expected a parse failure")?;
    assert_eq!(error.code, ErrorCode::new("config", "invalid_toml"));
    assert_eq!(
        error.metadata.get("source").map(String::as_str),
        Some("schema")
    );
    Ok(())
}

#[test]
fn pretty_toml_round_trips_through_the_loader() -> Result<(), Box<dyn Error>> {
    let original = parse_schema_file_json(&read_fixture("accounts.schema.json")?)?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("accounts.toml");
    fs::write(&path, to_pretty_toml(&original)?)?;

    let reloaded = load_schema_from_path(Some(&path), None, &ValidatorEnv::default())?;
    let reloaded: &SchemaFile = reloaded.as_ref();
    assert_eq!(reloaded, original.as_ref());
    Ok(())
}
