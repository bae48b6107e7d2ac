//! Typed connection options.
//!
//! [`ConnectionOptions`] has one optional field per recognized option name.
//! Absence is meaningful: defaults are applied when a client config is built,
//! never here.

use crate::error::OptionsError;
use crate::names;
use crate::node::{NodeFilter, NodeSelector};
use crate::validate::{RawOptions, validate_option_names};
use esbridge_shared::{SecretString, is_secret_key};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Host used when neither `url` nor `host` is supplied.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Port used when neither `url` nor `port` is supplied.
pub const DEFAULT_PORT: u16 = 9200;
/// Retry budget when `maxRetries` is absent.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Request timeout when `requestTimeoutMS` is absent.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Ping timeout when `pingTimeoutMS` is absent.
pub const DEFAULT_PING_TIMEOUT_MS: u64 = 3_000;

/// API key credential: an encoded token or an id/key pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiKey {
    /// Pre-encoded token, sent as is.
    Token(SecretString),
    /// Key id and secret, encoded by the client.
    Credentials {
        /// Key id.
        id: String,
        /// Key secret.
        #[serde(rename = "apiKey", alias = "api_key")]
        api_key: SecretString,
    },
}

/// TLS material supplied either as text (usually PEM) or raw bytes.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TlsMaterial {
    /// Text content.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl TlsMaterial {
    /// Borrow the material as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Size of the material in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true when the material is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short description that never includes the content.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Text(text) => format!("<text: {} bytes>", text.len()),
            Self::Bytes(bytes) => format!("<binary: {} bytes>", bytes.len()),
        }
    }
}

impl fmt::Debug for TlsMaterial {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.describe())
    }
}

impl From<&str> for TlsMaterial {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for TlsMaterial {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

/// How the wrapped client brings dead nodes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResurrectStrategy {
    /// Ping dead nodes before reuse.
    #[default]
    Ping,
    /// Reuse dead nodes without checking.
    Optimistic,
    /// Never resurrect.
    None,
}

impl ResurrectStrategy {
    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Optimistic => "optimistic",
            Self::None => "none",
        }
    }
}

/// Request body compression. Accepts `"gzip"` or `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Gzip request bodies.
    Gzip,
    /// Send bodies uncompressed.
    #[default]
    Disabled,
}

impl Compression {
    /// JSON form as accepted on input.
    #[must_use]
    pub fn to_json(self) -> Value {
        match self {
            Self::Gzip => Value::from("gzip"),
            Self::Disabled => Value::Bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for Compression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Flag(bool),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Flag(false) => Ok(Self::Disabled),
            Wire::Text(text) if text == "gzip" => Ok(Self::Gzip),
            Wire::Flag(true) => Err(de::Error::custom(
                "compression must be \"gzip\" or false",
            )),
            Wire::Text(text) => Err(de::Error::unknown_variant(&text, &["gzip"])),
        }
    }
}

/// `Many` is tried first so `[]` is an empty list, not an empty byte blob.
/// A flat array of numbers only matches `One`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<TlsMaterial>),
    One(TlsMaterial),
}

/// Typed connection options.
///
/// Every field corresponds to one recognized option name. Build one from
/// untyped input with [`ConnectionOptions::from_raw`], or programmatically
/// with struct update syntax over [`Default`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionOptions {
    /// Fully qualified endpoint URL. Wins over `host`/`port` when non-empty.
    pub url: Option<String>,
    /// Forward proxy endpoint.
    pub proxy: Option<String>,
    /// Endpoint host.
    pub host: Option<String>,
    /// Endpoint port.
    pub port: Option<u16>,
    /// API key credential.
    pub api_key: Option<ApiKey>,
    /// Basic-auth username.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<SecretString>,
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
    /// TLS master switch.
    pub ssl: Option<bool>,
    /// Validate the server certificate.
    pub ssl_validate: Option<bool>,
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
    /// Per-node routing eligibility.
    pub node_filter: Option<NodeFilter>,
    /// Node selection strategy.
    pub node_selector: Option<NodeSelector>,
    /// Client instance identifier.
    pub name: Option<String>,
}

impl ConnectionOptions {
    /// Validate names and type every value of an untyped option map.
    ///
    /// `null` values are treated as absent. The `type` tag, when present,
    /// must be `"elasticsearch"`.
    pub fn from_raw(raw: &RawOptions) -> Result<Self, OptionsError> {
        validate_option_names(raw)?;
        check_driver_type(raw)?;

        Ok(Self {
            url: field(raw, names::URL)?,
            proxy: field(raw, names::PROXY)?,
            host: field(raw, names::HOST)?,
            port: field(raw, names::PORT)?,
            api_key: field(raw, names::API_KEY)?,
            username: field(raw, names::USERNAME)?,
            password: field(raw, names::PASSWORD)?,
            max_retries: field(raw, names::MAX_RETRIES)?,
            request_timeout_ms: field(raw, names::REQUEST_TIMEOUT_MS)?,
            ping_timeout_ms: field(raw, names::PING_TIMEOUT_MS)?,
            resurrect_strategy: field(raw, names::RESURRECT_STRATEGY)?,
            suggest_compression: field(raw, names::SUGGEST_COMPRESSION)?,
            compression: field(raw, names::COMPRESSION)?,
            ssl: field(raw, names::SSL)?,
            ssl_validate: field(raw, names::SSL_VALIDATE)?,
            ssl_ca: field::<OneOrMany>(raw, names::SSL_CA)?.map(|value| match value {
                OneOrMany::One(material) => vec![material],
                OneOrMany::Many(materials) => materials,
            }),
            ssl_cert: field(raw, names::SSL_CERT)?,
            ssl_key: field(raw, names::SSL_KEY)?,
            ssl_pass: field(raw, names::SSL_PASS)?,
            ssl_crl: field(raw, names::SSL_CRL)?,
            node_filter: field(raw, names::NODE_FILTER)?,
            node_selector: field(raw, names::NODE_SELECTOR)?,
            name: field(raw, names::NAME)?,
        })
    }

    /// Validate and type a JSON value that should hold an option object.
    pub fn from_value(value: Value) -> Result<Self, OptionsError> {
        Self::from_raw(&raw_options_from_value(value)?)
    }

    /// Names of the options that are present, in whitelist order.
    #[must_use]
    pub fn present_option_names(&self) -> Vec<&'static str> {
        let flags = [
            (names::URL, self.url.is_some()),
            (names::PROXY, self.proxy.is_some()),
            (names::HOST, self.host.is_some()),
            (names::PORT, self.port.is_some()),
            (names::API_KEY, self.api_key.is_some()),
            (names::USERNAME, self.username.is_some()),
            (names::PASSWORD, self.password.is_some()),
            (names::MAX_RETRIES, self.max_retries.is_some()),
            (names::REQUEST_TIMEOUT_MS, self.request_timeout_ms.is_some()),
            (names::PING_TIMEOUT_MS, self.ping_timeout_ms.is_some()),
            (names::RESURRECT_STRATEGY, self.resurrect_strategy.is_some()),
            (names::SUGGEST_COMPRESSION, self.suggest_compression.is_some()),
            (names::COMPRESSION, self.compression.is_some()),
            (names::SSL, self.ssl.is_some()),
            (names::SSL_VALIDATE, self.ssl_validate.is_some()),
            (names::SSL_CA, self.ssl_ca.is_some()),
            (names::SSL_CERT, self.ssl_cert.is_some()),
            (names::SSL_KEY, self.ssl_key.is_some()),
            (names::SSL_PASS, self.ssl_pass.is_some()),
            (names::SSL_CRL, self.ssl_crl.is_some()),
            (names::NODE_FILTER, self.node_filter.is_some()),
            (names::NODE_SELECTOR, self.node_selector.is_some()),
            (names::NAME, self.name.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(name, present)| present.then_some(name))
            .collect()
    }
}

/// Unwrap a JSON value into an option map.
pub fn raw_options_from_value(value: Value) -> Result<RawOptions, OptionsError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(OptionsError::NotAnObject {
            found: json_type_name(&other),
        }),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_driver_type(raw: &RawOptions) -> Result<(), OptionsError> {
    match raw.get(names::TYPE) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(tag)) if tag == names::DRIVER_TYPE => Ok(()),
        Some(other) => Err(OptionsError::TypeMismatch {
            found: other.to_string(),
        }),
    }
}

fn field<T: DeserializeOwned>(
    raw: &RawOptions,
    name: &'static str,
) -> Result<Option<T>, OptionsError> {
    match raw.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(|error| {
            let reason = if is_secret_key(name) {
                "unexpected value shape".to_owned()
            } else {
                error.to_string()
            };
            OptionsError::InvalidValue { name, reason }
        }),
    }
}
