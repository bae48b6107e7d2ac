//! `ping`: connect, check the node, disconnect.

use super::{CommandContext, build_driver};
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{format_error_output, log_info, render_json};
use esbridge_adapters::SearchDriver;
use esbridge_shared::ErrorEnvelope;
use serde_json::json;
use std::time::Instant;

struct PingReport {
    node: String,
    elapsed_ms: u128,
}

pub async fn run_ping(context: &CommandContext<'_>) -> Result<CliOutput, CliError> {
    let mut driver = match build_driver(context) {
        Ok(driver) => driver,
        Err(error) => return Ok(format_error_output(context.mode, &error)),
    };

    let report = ping_once(&mut driver).await;
    if driver.is_connected() {
        if let Err(error) = driver.disconnect().await {
            tracing::warn!(error = %error, "disconnect after ping failed");
        }
    }
    let report = match report {
        Ok(report) => report,
        Err(error) => return Ok(format_error_output(context.mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "ping completed", context.mode.quiet);

    let stdout = if context.mode.is_json() {
        render_json(&json!({
            "status": "ok",
            "node": report.node,
            "elapsedMs": u64::try_from(report.elapsed_ms).unwrap_or(u64::MAX),
        }))?
    } else {
        format!(
            "status: ok\nnode: {}\nelapsed_ms: {}\n",
            report.node, report.elapsed_ms
        )
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

async fn ping_once(driver: &mut SearchDriver) -> Result<PingReport, ErrorEnvelope> {
    driver.connect().map_err(ErrorEnvelope::from)?;
    let runner = driver.create_query_runner().map_err(ErrorEnvelope::from)?;

    let started = Instant::now();
    runner.ping().await.map_err(ErrorEnvelope::from)?;
    Ok(PingReport {
        node: runner.client().node().to_owned(),
        elapsed_ms: started.elapsed().as_millis(),
    })
}
