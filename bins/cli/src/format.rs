//! Output format helpers for CLI commands.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use clap::{Args, ValueEnum};
use esbridge_shared::ErrorEnvelope;
use serde_json::{Value, json};
use std::fmt::Write as _;

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    #[default]
    Text,
    /// Machine-friendly JSON output.
    Json,
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format for command responses.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Suppress progress lines on stderr.
    #[arg(long, global = true)]
    pub quiet: bool,
    /// Write driver lifecycle events to stderr as JSON lines.
    #[arg(long, global = true)]
    pub log_events: bool,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
    pub quiet: bool,
    pub log_events: bool,
}

impl OutputMode {
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        Self {
            format: args.format,
            quiet: args.quiet,
            log_events: args.log_events,
        }
    }

    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

/// Pretty JSON followed by a newline.
pub fn render_json(payload: &Value) -> Result<String, CliError> {
    let mut output = serde_json::to_string_pretty(payload)?;
    output.push('\n');
    Ok(output)
}

pub fn log_info(stderr: &mut String, message: &str, quiet: bool) {
    if quiet {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

fn error_json(error: &ErrorEnvelope) -> Value {
    json!({
        "code": error.code.to_string(),
        "message": error.message,
        "kind": error.kind.to_string(),
        "retriable": error.class.is_retriable(),
        "metadata": error.metadata,
    })
}

fn error_text(error: &ErrorEnvelope) -> String {
    let mut output = format!("status: error\ncode: {}\nmessage: {}\n", error.code, error.message);
    for (key, value) in &error.metadata {
        let _ = writeln!(output, "{key}: {value}");
    }
    output
}

/// Render an error envelope on stdout with the matching exit code.
pub fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let stdout = if mode.is_json() {
        let payload = json!({ "status": "error", "error": error_json(error) });
        // This is a CLI boundary, so JSON serialization errors are internal.
        render_json(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"cli:internal\",\"message\":\"internal error\"}}\n"
                .to_owned()
        })
    } else {
        error_text(error)
    };

    CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::for_envelope(error),
    }
}
