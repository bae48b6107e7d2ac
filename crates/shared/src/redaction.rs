//! Secret detection and redaction utilities.
//!
//! Credentials flow through the option record (passwords, API keys, TLS key
//! passphrases). Anything that may end up in a log line or an error envelope
//! goes through these helpers first.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a key/variable name likely refers to a secret.
///
/// Matching is case-insensitive, so both `ESBRIDGE_PASSWORD` and `apiKey`
/// are detected.
///
/// # Examples
///
/// ```
/// use esbridge_shared::is_secret_key;
///
/// assert!(is_secret_key("apiKey"));
/// assert!(is_secret_key("ESBRIDGE_PASSWORD"));
/// assert!(is_secret_key("sslPass"));
/// assert!(!is_secret_key("host"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASS")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use esbridge_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("ESBRIDGE_API_KEY", "abc"), "[REDACTED]");
/// assert_eq!(redact_if_secret("ESBRIDGE_HOST", "localhost"), "localhost");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}

/// A secret string wrapper that redacts on Display/Debug.
///
/// Deserializes from a plain string. There is deliberately no `Serialize`
/// impl: rendering a secret requires an explicit [`SecretString::expose`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecretString(Box<str>);

impl SecretString {
    /// Wrap a secret value.
    pub fn new(value: impl Into<Box<str>>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true when the wrapped secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value.into_boxed_str())
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}
