//! Output format helpers for CLI commands.

use clap::Args;
use serde::Serialize;

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Emit machine-readable JSON output.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly text output.
    Text,
    /// Pretty JSON output.
    Json,
}

impl OutputMode {
    /// Build output mode from CLI flags.
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        if args.json { Self::Json } else { Self::Text }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Serialize `value` as pretty JSON with a trailing newline.
pub fn pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}
