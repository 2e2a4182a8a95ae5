//! Messages command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use dtoguard_config::{ValidatedSchemaFile, load_schema_std_env};
use dtoguard_validation::{MessageTable, ValidatorSettings};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize)]
struct MessagesReport<'a> {
    separator: &'a str,
    field_case: &'a str,
    fallback: &'a str,
    templates: BTreeMap<&'a str, &'a str>,
}

/// Run the messages command.
pub fn run_messages(mode: OutputMode, schema: Option<&Path>) -> Result<CliOutput, CliError> {
    let file = load_schema_std_env(schema, None)?;
    let table = effective_table(&file);
    let settings = file.settings();

    let stdout = if mode.is_json() {
        pretty_json(&MessagesReport {
            separator: &settings.separator,
            field_case: settings.field_case.as_str(),
            fallback: table.fallback(),
            templates: table.iter().collect(),
        })?
    } else {
        format_messages_text(&table, settings)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Process-wide table with the file's per-tag overrides layered on top.
pub fn effective_table(file: &ValidatedSchemaFile) -> MessageTable {
    let validator = file.validator();
    validator
        .table()
        .as_ref()
        .clone()
        .with_overrides(file.settings().messages.clone())
}

fn format_messages_text(table: &MessageTable, settings: &ValidatorSettings) -> String {
    let width = table.iter().map(|(tag, _)| tag.len()).max().unwrap_or(0);
    let mut out = format!(
        "separator: {:?}\nfield_case: {}\nfallback: {}\n",
        settings.separator,
        settings.field_case,
        table.fallback()
    );
    for (tag, template) in table.iter() {
        out.push_str(&format!("{tag:<width$}  {template}\n"));
    }
    out
}
