//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Parser, Subcommand};
use commands::{CheckCommandInput, run_check, run_info, run_json_schema, run_messages, run_show};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode, pretty_json};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "dtoguard",
    version,
    about = "Validate JSON payloads against dtoguard schema files",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a JSON document against a payload declared in a schema file.
    Check {
        /// Schema file path (JSON/TOML).
        #[arg(long)]
        schema: PathBuf,
        /// Payload name declared in the schema file.
        #[arg(long)]
        payload: String,
        /// JSON input file; reads stdin when omitted or `-`.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Partial schema file JSON merged over the file.
        #[arg(long)]
        overrides_json: Option<String>,
    },
    /// Print the effective tag to template message table.
    Messages {
        /// Optional schema file whose message overrides are applied.
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Print the merged schema file.
    Show {
        /// Optional schema file path (JSON/TOML).
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Partial schema file JSON merged over the file.
        #[arg(long)]
        overrides_json: Option<String>,
        /// Emit TOML instead of JSON.
        #[arg(long)]
        toml: bool,
    },
    /// Print the JSON Schema of the schema file format.
    JsonSchema,
    /// Show build and version details.
    Info,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(mode, &error),
        },
        Err(error) => exit_with_error(mode, &error),
    }
}

/// Logs go to stderr so stdout stays machine-readable; `RUST_LOG` selects the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    match command {
        Commands::Check {
            schema,
            payload,
            input,
            overrides_json,
        } => run_check(
            mode,
            CheckCommandInput {
                schema,
                payload,
                input: input.as_deref(),
                overrides_json: overrides_json.as_deref(),
            },
        ),
        Commands::Messages { schema } => run_messages(mode, schema.as_deref()),
        Commands::Show {
            schema,
            overrides_json,
            toml,
        } => run_show(schema.as_deref(), overrides_json.as_deref(), *toml),
        Commands::JsonSchema => run_json_schema(),
        Commands::Info => run_info(mode),
    }
}

fn exit_with_error(mode: OutputMode, error: &CliError) -> std::process::ExitCode {
    tracing::debug!(error = %error, "command failed");
    if mode.is_json() {
        let rendered = pretty_json(&error.envelope()).unwrap_or_else(|_| format!("{error}\n"));
        let _ = io::stdout().write_all(rendered.as_bytes());
    } else {
        let _ = writeln!(io::stderr(), "error: {error}");
    }
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
