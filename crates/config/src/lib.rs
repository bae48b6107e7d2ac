//! # esbridge-config
//!
//! Connection option whitelist, name validation, typed options, and the pure
//! builder that turns options into a search client config.
//! This crate depends on `shared` only.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Client config building.
pub mod client_config;
/// Environment variable parsing and merging.
pub mod env;
/// Option validation errors.
pub mod error;
/// Option loading helpers (file + env).
pub mod load;
/// Recognized option names.
pub mod names;
/// Node routing capabilities.
pub mod node;
/// Typed connection options.
pub mod options;
/// Option-name validation.
pub mod validate;

pub use client_config::{
    AuthDescriptor, ClientConfig, ResidualOptions, TlsDescriptor, TlsSettings,
    build_client_config, residual_options, resolve_auth, resolve_endpoint, resolve_tls,
    sanitize_url,
};
pub use env::{ConnectionEnv, EnvParseError, apply_env_overrides};
pub use error::OptionsError;
pub use load::{
    OptionsFormat, load_connection_options_from_path, load_connection_options_std_env,
    load_raw_options_from_path, parse_connection_options_json, parse_connection_options_toml,
    parse_raw_options,
};
pub use names::{DRIVER_TYPE, OPTION_NAMES};
pub use node::{FilterNodes, NodeDescriptor, NodeFilter, NodeSelector, SelectNode};
pub use options::{
    ApiKey, Compression, ConnectionOptions, DEFAULT_HOST, DEFAULT_MAX_RETRIES,
    DEFAULT_PING_TIMEOUT_MS, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_MS, ResurrectStrategy,
    TlsMaterial, raw_options_from_value,
};
pub use validate::{RawOptions, UnknownOptionPolicy, validate_names, validate_option_names};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
