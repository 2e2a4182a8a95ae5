//! Schema file inspection handlers.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::pretty_json;
use dtoguard_config::{load_schema_std_env, schema_file_json_schema, to_pretty_json, to_pretty_toml};
use std::path::Path;

/// Print the merged schema file (file, overrides, then env) as JSON or TOML.
pub fn run_show(
    schema: Option<&Path>,
    overrides_json: Option<&str>,
    toml: bool,
) -> Result<CliOutput, CliError> {
    let file = load_schema_std_env(schema, overrides_json)?;
    let stdout = if toml {
        to_pretty_toml(file.as_ref())?
    } else {
        to_pretty_json(file.as_ref())?
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Print the JSON Schema of the schema file format.
pub fn run_json_schema() -> Result<CliOutput, CliError> {
    Ok(CliOutput {
        stdout: pretty_json(&schema_file_json_schema())?,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
