//! # dtoguard-config
//!
//! Schema files for runtime-declared payloads and the validator settings
//! they carry. Files are JSON or TOML; loading merges defaults, the file,
//! a JSON overrides document, and env overrides in that order.

/// Environment variable parsing and merging.
pub mod env;
/// Schema loading helpers (env + file + overrides).
pub mod load;
/// Schema file format and validation.
pub mod schema;

pub use env::{ENV_FIELD_CASE, ENV_SEPARATOR, EnvParseError, ValidatorEnv, apply_env_overrides};
pub use load::{
    load_schema_from_path, load_schema_from_sources, load_schema_std_env, to_pretty_json,
    to_pretty_toml,
};
pub use schema::{
    CURRENT_SCHEMA_VERSION, ConfigSchemaError, FieldEntry, SchemaFile, ValidatedSchemaFile,
    parse_schema_file_json, parse_schema_file_toml, schema_file_json_schema,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
