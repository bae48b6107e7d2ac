//! Option loading helpers (file + env).
//!
//! Precedence (highest wins):
//! - env overrides (`ConnectionEnv`)
//! - option file content (JSON or TOML object)
//! - nothing (every option absent)

use crate::env::{ConnectionEnv, apply_env_overrides};
use crate::options::{ConnectionOptions, raw_options_from_value};
use crate::validate::RawOptions;
use esbridge_shared::{ErrorCode, ErrorEnvelope};
use serde_json::Value;
use std::path::Path;

/// Source format of an option document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsFormat {
    /// JSON object.
    Json,
    /// TOML table.
    Toml,
}

/// Parse an option document into a raw option map without validating names.
pub fn parse_raw_options(input: &str, format: OptionsFormat) -> Result<RawOptions, ErrorEnvelope> {
    let value: Value = match format {
        OptionsFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid options JSON: {error}"),
            )
            .with_metadata("source", "options")
        })?,
        OptionsFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid options TOML: {error}"),
            )
            .with_metadata("source", "options")
        })?,
    };
    raw_options_from_value(value).map_err(ErrorEnvelope::from)
}

/// Parse, validate, and type a JSON option document.
pub fn parse_connection_options_json(input: &str) -> Result<ConnectionOptions, ErrorEnvelope> {
    let raw = parse_raw_options(input, OptionsFormat::Json)?;
    ConnectionOptions::from_raw(&raw).map_err(ErrorEnvelope::from)
}

/// Parse, validate, and type a TOML option document.
pub fn parse_connection_options_toml(input: &str) -> Result<ConnectionOptions, ErrorEnvelope> {
    let raw = parse_raw_options(input, OptionsFormat::Toml)?;
    ConnectionOptions::from_raw(&raw).map_err(ErrorEnvelope::from)
}

/// Load the raw option map from an optional file and merge env overrides.
///
/// Names are not validated here so a driver can run its own construction-time
/// check on exactly what the caller supplied.
pub fn load_raw_options_from_path(
    path: Option<&Path>,
    env: &ConnectionEnv,
) -> Result<RawOptions, ErrorEnvelope> {
    let mut raw = match path {
        None => RawOptions::new(),
        Some(path) => {
            let text = read_options_file(path)?;
            let format = detect_options_format(path)?;
            parse_raw_options(&text, format)
                .map_err(|error| error.with_metadata("path", path.to_string_lossy().to_string()))?
        },
    };

    // env is applied last.
    apply_env_overrides(&mut raw, env);
    Ok(raw)
}

/// Load, validate, and type connection options from a file and env overrides.
pub fn load_connection_options_from_path(
    path: Option<&Path>,
    env: &ConnectionEnv,
) -> Result<ConnectionOptions, ErrorEnvelope> {
    let raw = load_raw_options_from_path(path, env)?;
    ConnectionOptions::from_raw(&raw).map_err(ErrorEnvelope::from)
}

/// Load connection options from std env and an optional file path.
pub fn load_connection_options_std_env(
    path: Option<&Path>,
) -> Result<ConnectionOptions, ErrorEnvelope> {
    let env = ConnectionEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_connection_options_from_path(path, &env)
}

fn read_options_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "options_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "options_file_permission_denied")
            },
            _ => ErrorCode::new("config", "options_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read options file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_options_format(path: &Path) -> Result<OptionsFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(OptionsFormat::Json),
        Some("toml") => Ok(OptionsFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported options format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}
