//! `config check` and `config show`.

use super::{CommandContext, build_driver};
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{format_error_output, log_info, render_json};
use esbridge_config::build_client_config;
use serde_json::json;
use std::fmt::Write as _;

/// Validate the effective options without building a client.
pub fn run_config_check(context: &CommandContext<'_>) -> Result<CliOutput, CliError> {
    let driver = match build_driver(context) {
        Ok(driver) => driver,
        Err(error) => return Ok(format_error_output(context.mode, &error)),
    };
    let options = driver.options().present_option_names();

    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", context.mode.quiet);

    let stdout = if context.mode.is_json() {
        render_json(&json!({
            "status": "ok",
            "configPath": context.config.map(|path| path.to_string_lossy().to_string()),
            "options": options,
        }))?
    } else {
        let mut output = String::from("status: ok\n");
        if let Some(path) = context.config {
            let _ = writeln!(output, "path: {}", path.to_string_lossy());
        }
        let _ = writeln!(output, "options: {}", options.join(", "));
        output
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Print the client config the options resolve to, with secrets redacted.
pub fn run_config_show(context: &CommandContext<'_>) -> Result<CliOutput, CliError> {
    let driver = match build_driver(context) {
        Ok(driver) => driver,
        Err(error) => return Ok(format_error_output(context.mode, &error)),
    };
    let config = build_client_config(driver.options()).to_redacted_json();

    let stdout = if context.mode.is_json() {
        render_json(&json!({ "status": "ok", "clientConfig": config }))?
    } else {
        render_json(&config)?
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
