//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use dtoguard_api::api_crate_version;
use dtoguard_config::config_crate_version;
use dtoguard_validation::validation_crate_version;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct InfoReport {
    name: &'static str,
    version: &'static str,
    validation: &'static str,
    config: &'static str,
    api: &'static str,
}

impl InfoReport {
    const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            validation: validation_crate_version(),
            config: config_crate_version(),
            api: api_crate_version(),
        }
    }
}

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let report = InfoReport::current();
    let stdout = if mode.is_json() {
        pretty_json(&report)?
    } else {
        format!(
            "status: ok\nname: {}\nversion: {}\nvalidation: {}\nconfig: {}\napi: {}\n",
            report.name, report.version, report.validation, report.config, report.api
        )
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
