//! Environment variable parsing and env-to-options merging.
//!
//! Env parsing is strict (invalid values fail fast) and safe (secret values
//! are redacted in error metadata). Parsed values are merged into the raw
//! option map, so env-supplied options go through the same name validation
//! and typing as file-supplied ones.

use crate::names;
use crate::validate::RawOptions;
use esbridge_shared::{ErrorCode, ErrorEnvelope, SecretString, redact_if_secret};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Env var: endpoint URL.
pub const ENV_URL: &str = "ESBRIDGE_URL";
/// Env var: endpoint host.
pub const ENV_HOST: &str = "ESBRIDGE_HOST";
/// Env var: endpoint port.
pub const ENV_PORT: &str = "ESBRIDGE_PORT";
/// Env var: forward proxy URL.
pub const ENV_PROXY: &str = "ESBRIDGE_PROXY";
/// Env var: API key token (secret).
pub const ENV_API_KEY: &str = "ESBRIDGE_API_KEY";
/// Env var: basic-auth username.
pub const ENV_USERNAME: &str = "ESBRIDGE_USERNAME";
/// Env var: basic-auth password (secret).
pub const ENV_PASSWORD: &str = "ESBRIDGE_PASSWORD";
/// Env var: TLS master switch.
pub const ENV_SSL: &str = "ESBRIDGE_SSL";
/// Env var: validate the server certificate.
pub const ENV_SSL_VALIDATE: &str = "ESBRIDGE_SSL_VALIDATE";
/// Env var: retry budget.
pub const ENV_MAX_RETRIES: &str = "ESBRIDGE_MAX_RETRIES";
/// Env var: request timeout in milliseconds.
pub const ENV_REQUEST_TIMEOUT_MS: &str = "ESBRIDGE_REQUEST_TIMEOUT_MS";
/// Env var: ping timeout in milliseconds.
pub const ENV_PING_TIMEOUT_MS: &str = "ESBRIDGE_PING_TIMEOUT_MS";
/// Env var: client instance identifier.
pub const ENV_NAME: &str = "ESBRIDGE_NAME";

/// Every env var read by [`ConnectionEnv::from_std_env`].
pub const ENV_VARS: [&str; 13] = [
    ENV_URL,
    ENV_HOST,
    ENV_PORT,
    ENV_PROXY,
    ENV_API_KEY,
    ENV_USERNAME,
    ENV_PASSWORD,
    ENV_SSL,
    ENV_SSL_VALIDATE,
    ENV_MAX_RETRIES,
    ENV_REQUEST_TIMEOUT_MS,
    ENV_PING_TIMEOUT_MS,
    ENV_NAME,
];

/// Connection option overrides parsed from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionEnv {
    /// `url` override.
    pub url: Option<Box<str>>,
    /// `host` override.
    pub host: Option<Box<str>>,
    /// `port` override.
    pub port: Option<u16>,
    /// `proxy` override.
    pub proxy: Option<Box<str>>,
    /// `apiKey` override (token form).
    pub api_key: Option<SecretString>,
    /// `username` override.
    pub username: Option<Box<str>>,
    /// `password` override.
    pub password: Option<SecretString>,
    /// `ssl` override.
    pub ssl: Option<bool>,
    /// `sslValidate` override.
    pub ssl_validate: Option<bool>,
    /// `maxRetries` override.
    pub max_retries: Option<u32>,
    /// `requestTimeoutMS` override.
    pub request_timeout_ms: Option<u64>,
    /// `pingTimeoutMS` override.
    pub ping_timeout_ms: Option<u64>,
    /// `name` override.
    pub name: Option<Box<str>>,
}

impl ConnectionEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            url: parse_optional_url_string(map, ENV_URL)?,
            host: parse_optional_trimmed_string(map, ENV_HOST)?,
            port: parse_optional_port(map, ENV_PORT)?,
            proxy: parse_optional_url_string(map, ENV_PROXY)?,
            api_key: parse_optional_secret(map, ENV_API_KEY)?,
            username: parse_optional_trimmed_string(map, ENV_USERNAME)?,
            password: parse_optional_secret(map, ENV_PASSWORD)?,
            ssl: parse_optional_bool(map, ENV_SSL)?,
            ssl_validate: parse_optional_bool(map, ENV_SSL_VALIDATE)?,
            max_retries: parse_optional_u32(map, ENV_MAX_RETRIES)?,
            request_timeout_ms: parse_optional_u64(map, ENV_REQUEST_TIMEOUT_MS)?,
            ping_timeout_ms: parse_optional_u64(map, ENV_PING_TIMEOUT_MS)?,
            name: parse_optional_trimmed_string(map, ENV_NAME)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let map: BTreeMap<String, String> = ENV_VARS
            .iter()
            .filter_map(|name| {
                std::env::var(name)
                    .ok()
                    .map(|value| ((*name).to_owned(), value))
            })
            .collect();
        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Merge env overrides into a raw option map. Env values win.
pub fn apply_env_overrides(raw: &mut RawOptions, env: &ConnectionEnv) {
    let mut set = |name: &str, value: Option<Value>| {
        if let Some(value) = value {
            raw.insert(name.to_owned(), value);
        }
    };

    set(names::URL, env.url.as_deref().map(Value::from));
    set(names::HOST, env.host.as_deref().map(Value::from));
    set(names::PORT, env.port.map(Value::from));
    set(names::PROXY, env.proxy.as_deref().map(Value::from));
    set(
        names::API_KEY,
        env.api_key.as_ref().map(|key| Value::from(key.expose())),
    );
    set(names::USERNAME, env.username.as_deref().map(Value::from));
    set(
        names::PASSWORD,
        env.password
            .as_ref()
            .map(|password| Value::from(password.expose())),
    );
    set(names::SSL, env.ssl.map(Value::from));
    set(names::SSL_VALIDATE, env.ssl_validate.map(Value::from));
    set(names::MAX_RETRIES, env.max_retries.map(Value::from));
    set(names::REQUEST_TIMEOUT_MS, env.request_timeout_ms.map(Value::from));
    set(names::PING_TIMEOUT_MS, env.ping_timeout_ms.map(Value::from));
    set(names::NAME, env.name.as_deref().map(Value::from));
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// A secret env var was present but empty after trimming.
    EmptySecret {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// URL env var had an invalid value.
    InvalidUrl {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } | Self::EmptySecret { .. } => {
                ErrorCode::new("config", "empty_env_var")
            },
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::InvalidUrl { .. } => ErrorCode::new("config", "invalid_env_url"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } | Self::EmptySecret { var } => {
                write!(formatter, "{var} must be non-empty")
            },
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::InvalidUrl { var, .. } => write!(formatter, "{var} must be a valid URL"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } | EnvParseError::EmptySecret { var } => {
                envelope.with_metadata("env_var", var)
            },
            EnvParseError::InvalidBool { var, value }
            | EnvParseError::InvalidInt { var, value }
            | EnvParseError::InvalidUrl { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", redact_if_secret(var, &value)),
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

fn parse_optional_secret(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<SecretString>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptySecret { var });
    }

    Ok(Some(SecretString::new(trimmed.to_owned())))
}

fn parse_optional_int<T: std::str::FromStr>(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<T>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

fn parse_optional_port(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u16>, EnvParseError> {
    parse_optional_int(map, var)
}

fn parse_optional_u32(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u32>, EnvParseError> {
    parse_optional_int(map, var)
}

fn parse_optional_u64(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u64>, EnvParseError> {
    parse_optional_int(map, var)
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}

fn parse_optional_url_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    let parsed = Url::parse(trimmed).map_err(|_| EnvParseError::InvalidUrl {
        var,
        value: raw.clone(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(EnvParseError::InvalidUrl {
            var,
            value: raw.clone(),
        });
    }

    // Keep the value as typed: `Url` would append a trailing slash.
    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error;

    fn env_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn missing_vars_parse_to_empty_env() -> Result<(), Box<dyn Error>> {
        let env = ConnectionEnv::from_map(&BTreeMap::new())?;
        assert!(env.is_empty());
        Ok(())
    }

    #[test]
    fn values_are_trimmed_and_typed() -> Result<(), Box<dyn Error>> {
        let env = ConnectionEnv::from_map(&env_map(&[
            (ENV_HOST, "  es.local "),
            (ENV_PORT, "9201"),
            (ENV_SSL, "yes"),
            (ENV_REQUEST_TIMEOUT_MS, "5000"),
        ]))?;
        assert_eq!(env.host.as_deref(), Some("es.local"));
        assert_eq!(env.port, Some(9201));
        assert_eq!(env.ssl, Some(true));
        assert_eq!(env.request_timeout_ms, Some(5000));
        Ok(())
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let error = ConnectionEnv::from_map(&env_map(&[(ENV_PORT, "70000")])).err();
        assert!(matches!(error, Some(EnvParseError::InvalidInt { var, .. }) if var == ENV_PORT));
    }

    #[test]
    fn url_validation_accepts_http_and_https() -> Result<(), Box<dyn Error>> {
        let env = ConnectionEnv::from_map(&env_map(&[(ENV_URL, "https://es.example:9243")]))?;
        assert_eq!(env.url.as_deref(), Some("https://es.example:9243"));

        let error = ConnectionEnv::from_map(&env_map(&[(ENV_URL, "ftp://es.example")])).err();
        assert!(matches!(error, Some(EnvParseError::InvalidUrl { .. })));
        Ok(())
    }

    #[test]
    fn secret_values_are_redacted_in_error_metadata() -> Result<(), Box<dyn Error>> {
        let envelope: ErrorEnvelope = EnvParseError::InvalidBool {
            var: ENV_PASSWORD,
            value: "hunter2".to_owned(),
        }
        .into();
        assert_eq!(
            envelope.metadata.get("value").map(String::as_str),
            Some(esbridge_shared::REDACTED)
        );

        let error = ConnectionEnv::from_map(&env_map(&[(ENV_API_KEY, "   ")])).err();
        let envelope: ErrorEnvelope = error
            .ok_or_else(|| std::io::Error::other("expected secret error"))?
            .into();
        assert_eq!(envelope.code, ErrorCode::new("config", "empty_env_var"));
        assert!(!envelope.metadata.contains_key("value"));
        Ok(())
    }

    #[test]
    fn overrides_replace_raw_values() -> Result<(), Box<dyn Error>> {
        let env = ConnectionEnv::from_map(&env_map(&[
            (ENV_HOST, "from-env"),
            (ENV_PASSWORD, "s3cret"),
            (ENV_MAX_RETRIES, "7"),
        ]))?;
        let mut raw = RawOptions::new();
        raw.insert("host".to_owned(), json!("from-file"));
        raw.insert("port".to_owned(), json!(9300));

        apply_env_overrides(&mut raw, &env);

        assert_eq!(raw.get("host"), Some(&json!("from-env")));
        assert_eq!(raw.get("port"), Some(&json!(9300)));
        assert_eq!(raw.get("password"), Some(&json!("s3cret")));
        assert_eq!(raw.get("maxRetries"), Some(&json!(7)));
        Ok(())
    }
}
