//! Check command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use dtoguard_api::{ApiError, MessageResponse, ResponseSender};
use dtoguard_config::{ValidatedSchemaFile, load_schema_std_env};
use std::io::Read;
use std::path::Path;

/// Inputs for the check command.
#[derive(Debug, Clone, Copy)]
pub struct CheckCommandInput<'a> {
    pub schema: &'a Path,
    pub payload: &'a str,
    pub input: Option<&'a Path>,
    pub overrides_json: Option<&'a str>,
}

/// Run the check command.
pub fn run_check(mode: OutputMode, input: CheckCommandInput<'_>) -> Result<CliOutput, CliError> {
    let file = load_schema_std_env(Some(input.schema), input.overrides_json)?;
    let body = read_input(input.input)?;
    let response = check_body(&file, input.payload, &body)?;

    let exit_code = if response.is_success() {
        ExitCode::Ok
    } else {
        ExitCode::Rejected
    };
    let stdout = if mode.is_json() {
        pretty_json(&response)?
    } else {
        format_response_text(&response)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code,
    })
}

/// Validate `body` against the named payload and build the response envelope.
///
/// Unknown payload names are config errors; a body that is not JSON or
/// fails validation is a rejected request.
pub fn check_body(
    file: &ValidatedSchemaFile,
    payload: &str,
    body: &str,
) -> Result<MessageResponse, CliError> {
    let schema = file.payload(payload)?;
    let sender = ResponseSender::new(false);

    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(error) => {
            let error = ApiError::bad_request(format!("invalid request body: {error}"));
            return Ok(sender.send_error(&error));
        },
    };

    match schema.validate_json_with(&file.validator(), &value) {
        Ok(()) => {
            tracing::debug!(payload, "payload accepted");
            Ok(sender.send_msg(format!("{payload} is valid")))
        },
        Err(error) => Ok(sender.send_error(&ApiError::from(error))),
    }
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        },
    }
}

fn format_response_text(response: &MessageResponse) -> String {
    let status = if response.is_success() { "ok" } else { "rejected" };
    format!("status: {status}\nmessage: {}\n", response.message)
}
