//! Client config building.
//!
//! Turns [`ConnectionOptions`] into the [`ClientConfig`] handed to a search
//! client factory. Building is pure: no I/O, no URL parsing, no failures.
//! Every option lands in exactly one place: the endpoint, the auth
//! descriptor, the TLS descriptor, or the residual bag.

use crate::names;
use crate::node::{NodeFilter, NodeSelector};
use crate::options::{
    ApiKey, Compression, ConnectionOptions, DEFAULT_HOST, DEFAULT_MAX_RETRIES,
    DEFAULT_PING_TIMEOUT_MS, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_MS, ResurrectStrategy,
    TlsMaterial,
};
use esbridge_shared::{REDACTED, SecretString};
use serde_json::{Map, Value, json};
use url::Url;

/// Credentials forwarded to the client.
///
/// Present fields are forwarded as is. When more than one credential is set
/// the client decides precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthDescriptor {
    /// API key credential.
    pub api_key: Option<ApiKey>,
    /// Basic-auth username.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<SecretString>,
}

impl AuthDescriptor {
    /// Returns true when any credential field is present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some() || self.username.is_some() || self.password.is_some()
    }
}

/// TLS parameters for an enabled connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsDescriptor {
    /// Validate the server certificate. Defaults to `true`.
    pub ssl_validate: bool,
    /// Trusted certificate authorities.
    pub ssl_ca: Option<Vec<TlsMaterial>>,
    /// Client certificate.
    pub ssl_cert: Option<TlsMaterial>,
    /// Client private key.
    pub ssl_key: Option<TlsMaterial>,
    /// Client private key passphrase.
    pub ssl_pass: Option<TlsMaterial>,
    /// Certificate revocation list.
    pub ssl_crl: Option<TlsMaterial>,
}

/// TLS setting: off, or on with a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsSettings {
    /// Plain HTTP. Every TLS sub-option is ignored.
    #[default]
    Disabled,
    /// HTTPS with the given parameters.
    Enabled(TlsDescriptor),
}

impl TlsSettings {
    /// Returns true when TLS is on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Borrow the descriptor when TLS is on.
    #[must_use]
    pub const fn descriptor(&self) -> Option<&TlsDescriptor> {
        match self {
            Self::Enabled(descriptor) => Some(descriptor),
            Self::Disabled => None,
        }
    }
}

/// Options forwarded to the client unchanged.
///
/// Values stay exactly as supplied; the `effective_*` accessors apply the
/// client defaults for callers that need a concrete value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidualOptions {
    /// Forward proxy endpoint.
    pub proxy: Option<String>,
    /// Retry budget.
    pub max_retries: Option<u32>,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Ping timeout in milliseconds.
    pub ping_timeout_ms: Option<u64>,
    /// Node resurrection strategy.
    pub resurrect_strategy: Option<ResurrectStrategy>,
    /// Add `accept-encoding` to every request.
    pub suggest_compression: Option<bool>,
    /// Request body compression.
    pub compression: Option<Compression>,
    /// Per-node routing eligibility.
    pub node_filter: Option<NodeFilter>,
    /// Node selection strategy.
    pub node_selector: Option<NodeSelector>,
    /// Client instance identifier.
    pub name: Option<String>,
}

impl ResidualOptions {
    /// Retry budget with the default applied.
    #[must_use]
    pub fn effective_max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    /// Request timeout with the default applied.
    #[must_use]
    pub fn effective_request_timeout_ms(&self) -> u64 {
        self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
    }

    /// Ping timeout with the default applied.
    #[must_use]
    pub fn effective_ping_timeout_ms(&self) -> u64 {
        self.ping_timeout_ms.unwrap_or(DEFAULT_PING_TIMEOUT_MS)
    }

    /// Resurrection strategy with the default applied.
    #[must_use]
    pub fn effective_resurrect_strategy(&self) -> ResurrectStrategy {
        self.resurrect_strategy.unwrap_or_default()
    }

    /// Compression with the default applied.
    #[must_use]
    pub fn effective_compression(&self) -> Compression {
        self.compression.unwrap_or_default()
    }

    /// Names of the residual options that are present.
    #[must_use]
    pub fn present_option_names(&self) -> Vec<&'static str> {
        [
            (names::PROXY, self.proxy.is_some()),
            (names::MAX_RETRIES, self.max_retries.is_some()),
            (names::REQUEST_TIMEOUT_MS, self.request_timeout_ms.is_some()),
            (names::PING_TIMEOUT_MS, self.ping_timeout_ms.is_some()),
            (names::RESURRECT_STRATEGY, self.resurrect_strategy.is_some()),
            (names::SUGGEST_COMPRESSION, self.suggest_compression.is_some()),
            (names::COMPRESSION, self.compression.is_some()),
            (names::NODE_FILTER, self.node_filter.is_some()),
            (names::NODE_SELECTOR, self.node_selector.is_some()),
            (names::NAME, self.name.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    fn to_redacted_json(&self, output: &mut Map<String, Value>) {
        let mut put = |name: &str, value: Option<Value>| {
            if let Some(value) = value {
                output.insert(name.to_owned(), value);
            }
        };
        put(
            names::PROXY,
            self.proxy.as_deref().map(|proxy| json!(sanitize_url(proxy))),
        );
        put(names::MAX_RETRIES, self.max_retries.map(|value| json!(value)));
        put(
            names::REQUEST_TIMEOUT_MS,
            self.request_timeout_ms.map(|value| json!(value)),
        );
        put(
            names::PING_TIMEOUT_MS,
            self.ping_timeout_ms.map(|value| json!(value)),
        );
        put(
            names::RESURRECT_STRATEGY,
            self.resurrect_strategy.map(|value| json!(value.as_str())),
        );
        put(
            names::SUGGEST_COMPRESSION,
            self.suggest_compression.map(|value| json!(value)),
        );
        put(names::COMPRESSION, self.compression.map(Compression::to_json));
        put(
            names::NODE_FILTER,
            self.node_filter.as_ref().map(|value| json!(value.label())),
        );
        put(
            names::NODE_SELECTOR,
            self.node_selector.as_ref().map(|value| json!(value.label())),
        );
        put(names::NAME, self.name.as_deref().map(|value| json!(value)));
    }
}

/// Configuration handed to a search client factory.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Single endpoint URL.
    pub node: String,
    /// Credentials.
    pub auth: AuthDescriptor,
    /// TLS setting.
    pub ssl: TlsSettings,
    /// Options forwarded unchanged.
    pub residual: ResidualOptions,
}

impl ClientConfig {
    /// Render the config as JSON with every secret replaced by `[REDACTED]`.
    ///
    /// Credentials embedded in the node or proxy URL are stripped as well.
    /// TLS material is summarized by size; keys and passphrases are redacted.
    #[must_use]
    pub fn to_redacted_json(&self) -> Value {
        let mut output = Map::new();
        output.insert("node".to_owned(), json!(sanitize_url(&self.node)));
        output.insert("auth".to_owned(), redacted_auth(&self.auth));
        output.insert(
            "ssl".to_owned(),
            self.ssl.descriptor().map_or(Value::Null, redacted_tls),
        );
        self.residual.to_redacted_json(&mut output);
        Value::Object(output)
    }
}

fn redacted_auth(auth: &AuthDescriptor) -> Value {
    let api_key = match &auth.api_key {
        None => Value::Null,
        Some(ApiKey::Token(_)) => json!(REDACTED),
        Some(ApiKey::Credentials { id, .. }) => json!({ "id": id, "apiKey": REDACTED }),
    };
    json!({
        "apiKey": api_key,
        "username": auth.username,
        "password": auth.password.as_ref().map(|_| REDACTED),
    })
}

fn redacted_tls(tls: &TlsDescriptor) -> Value {
    let describe = |material: Option<&TlsMaterial>| material.map(TlsMaterial::describe);
    let redact = |material: Option<&TlsMaterial>| material.map(|_| REDACTED);
    let ssl_ca: Option<Vec<String>> = tls
        .ssl_ca
        .as_ref()
        .map(|materials| materials.iter().map(TlsMaterial::describe).collect());
    json!({
        "sslValidate": tls.ssl_validate,
        "sslCA": ssl_ca,
        "sslCert": describe(tls.ssl_cert.as_ref()),
        "sslKey": redact(tls.ssl_key.as_ref()),
        "sslPass": redact(tls.ssl_pass.as_ref()),
        "sslCRL": describe(tls.ssl_crl.as_ref()),
    })
}

/// Strip userinfo, query, and fragment from a URL before it is shown.
///
/// Input that does not parse as a URL is returned unchanged.
#[must_use]
pub fn sanitize_url(input: &str) -> String {
    let Ok(mut url) = Url::parse(input) else {
        return input.to_owned();
    };
    if url.cannot_be_a_base() {
        return input.to_owned();
    }
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

/// Resolve the single endpoint URL.
///
/// A non-empty `url` is used verbatim and `host`/`port`/`ssl` are ignored for
/// the endpoint. Otherwise the URL is assembled from the scheme picked by
/// `ssl`, then `host` and `port` with their defaults.
#[must_use]
pub fn resolve_endpoint(options: &ConnectionOptions) -> String {
    if let Some(url) = options.url.as_deref().filter(|url| !url.is_empty()) {
        if options.host.is_some() || options.port.is_some() {
            tracing::debug!(
                node = %sanitize_url(url),
                "url takes precedence over host and port"
            );
        }
        return url.to_owned();
    }

    let scheme = if options.ssl == Some(true) {
        "https"
    } else {
        "http"
    };
    let host = options.host.as_deref().unwrap_or(DEFAULT_HOST);
    let port = options.port.unwrap_or(DEFAULT_PORT);
    format!("{scheme}://{host}:{port}")
}

/// Collect the credential fields.
#[must_use]
pub fn resolve_auth(options: &ConnectionOptions) -> AuthDescriptor {
    AuthDescriptor {
        api_key: options.api_key.clone(),
        username: options.username.clone(),
        password: options.password.clone(),
    }
}

/// Resolve the TLS setting. Only `ssl == Some(true)` enables TLS.
#[must_use]
pub fn resolve_tls(options: &ConnectionOptions) -> TlsSettings {
    if options.ssl != Some(true) {
        return TlsSettings::Disabled;
    }
    TlsSettings::Enabled(TlsDescriptor {
        ssl_validate: options.ssl_validate.unwrap_or(true),
        ssl_ca: options.ssl_ca.clone(),
        ssl_cert: options.ssl_cert.clone(),
        ssl_key: options.ssl_key.clone(),
        ssl_pass: options.ssl_pass.clone(),
        ssl_crl: options.ssl_crl.clone(),
    })
}

/// Collect every option that is not consumed by the endpoint, auth, or TLS.
#[must_use]
pub fn residual_options(options: &ConnectionOptions) -> ResidualOptions {
    // Exhaustive destructuring: a new option field must be routed here or in
    // one of the resolvers above before this compiles.
    let ConnectionOptions {
        url: _,
        host: _,
        port: _,
        api_key: _,
        username: _,
        password: _,
        ssl: _,
        ssl_validate: _,
        ssl_ca: _,
        ssl_cert: _,
        ssl_key: _,
        ssl_pass: _,
        ssl_crl: _,
        proxy,
        max_retries,
        request_timeout_ms,
        ping_timeout_ms,
        resurrect_strategy,
        suggest_compression,
        compression,
        node_filter,
        node_selector,
        name,
    } = options;

    ResidualOptions {
        proxy: proxy.clone(),
        max_retries: *max_retries,
        request_timeout_ms: *request_timeout_ms,
        ping_timeout_ms: *ping_timeout_ms,
        resurrect_strategy: *resurrect_strategy,
        suggest_compression: *suggest_compression,
        compression: *compression,
        node_filter: node_filter.clone(),
        node_selector: node_selector.clone(),
        name: name.clone(),
    }
}

/// Build the client config from typed options.
///
/// Deterministic and side-effect free apart from a debug log when `url`
/// shadows `host`/`port`.
#[must_use]
pub fn build_client_config(options: &ConnectionOptions) -> ClientConfig {
    ClientConfig {
        node: resolve_endpoint(options),
        auth: resolve_auth(options),
        ssl: resolve_tls(options),
        residual: residual_options(options),
    }
}
