//! CLI command implementations.

mod config;
mod ping;

pub use config::{run_config_check, run_config_show};
pub use ping::run_ping;

use crate::format::OutputMode;
use esbridge_adapters::{ClientRegistry, JsonLogger, SearchDriver, StderrLogSink};
use esbridge_config::{ConnectionEnv, UnknownOptionPolicy, load_raw_options_from_path};
use esbridge_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Inputs shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub env: &'a BTreeMap<String, String>,
    pub config: Option<&'a Path>,
    pub policy: UnknownOptionPolicy,
    pub mode: OutputMode,
}

/// Load options from the file and env, then build a driver over them.
fn build_driver(context: &CommandContext<'_>) -> Result<SearchDriver, ErrorEnvelope> {
    let env = ConnectionEnv::from_map(context.env).map_err(ErrorEnvelope::from)?;
    let raw = load_raw_options_from_path(context.config, &env)?;
    let driver = SearchDriver::with_policy(&raw, &ClientRegistry::with_defaults(), context.policy)
        .map_err(ErrorEnvelope::from)?;

    if context.mode.log_events {
        return Ok(driver.with_logger(Arc::new(JsonLogger::new(Arc::new(StderrLogSink)))));
    }
    Ok(driver)
}
