//! Option-name validation.
//!
//! Runs twice per driver lifecycle: once on the raw input at construction and
//! once on the typed record right before a client is built.

use crate::error::OptionsError;
use crate::names;
use serde_json::{Map, Value};

/// Untyped connection options keyed by option name.
///
/// Keys iterate in sorted order, which makes "first unknown key" deterministic.
pub type RawOptions = Map<String, Value>;

/// What to do with keys outside the recognized names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownOptionPolicy {
    /// Fail on the first unknown key.
    #[default]
    Reject,
    /// Log every unknown key at warn level and continue.
    Warn,
}

/// Check that every key in `options` is a recognized option name.
///
/// Values are not inspected.
///
/// # Examples
///
/// ```
/// use esbridge_config::{RawOptions, validate_option_names};
/// use serde_json::json;
///
/// let mut options = RawOptions::new();
/// options.insert("host".to_owned(), json!("localhost"));
/// assert!(validate_option_names(&options).is_ok());
///
/// options.insert("foo".to_owned(), json!(1));
/// assert!(validate_option_names(&options).is_err());
/// ```
pub fn validate_option_names(options: &RawOptions) -> Result<(), OptionsError> {
    validate_names(
        options.keys().map(String::as_str),
        UnknownOptionPolicy::Reject,
    )
}

/// Check option names from any source against the recognized names.
///
/// With [`UnknownOptionPolicy::Reject`] the first unknown name (in iteration
/// order) is returned. With [`UnknownOptionPolicy::Warn`] every unknown name
/// is logged and the call succeeds.
pub fn validate_names<'a, I>(names: I, policy: UnknownOptionPolicy) -> Result<(), OptionsError>
where
    I: IntoIterator<Item = &'a str>,
{
    for name in names {
        if names::is_recognized(name) {
            continue;
        }

        let error = OptionsError::UnknownOption {
            name: name.to_owned(),
            suggestion: names::suggest(name),
        };
        match policy {
            UnknownOptionPolicy::Reject => return Err(error),
            UnknownOptionPolicy::Warn => {
                tracing::warn!(option = %name, "{error}");
            },
        }
    }
    Ok(())
}
