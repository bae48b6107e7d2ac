//! Option validation errors.

use esbridge_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// Failures produced while validating or typing connection options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// A key outside the recognized option names was supplied.
    UnknownOption {
        /// The offending key, as supplied.
        name: String,
        /// Recognized name the key most likely meant.
        suggestion: Option<&'static str>,
    },
    /// A recognized option carried a value of the wrong shape.
    InvalidValue {
        /// Option name.
        name: &'static str,
        /// Parser message describing the mismatch.
        reason: String,
    },
    /// The `type` tag names a different driver.
    TypeMismatch {
        /// Tag that was supplied, rendered as JSON.
        found: String,
    },
    /// The option source is not a key/value object.
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },
}

impl OptionsError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownOption { .. } => ErrorCode::new("config", "unknown_option"),
            Self::InvalidValue { .. } | Self::NotAnObject { .. } => {
                ErrorCode::new("config", "invalid_option_value")
            },
            Self::TypeMismatch { .. } => ErrorCode::new("config", "type_mismatch"),
        }
    }

    /// Returns the option name this error is about, when there is one.
    #[must_use]
    pub fn option_name(&self) -> Option<&str> {
        match self {
            Self::UnknownOption { name, .. } => Some(name.as_str()),
            Self::InvalidValue { name, .. } => Some(*name),
            Self::TypeMismatch { .. } => Some(crate::names::TYPE),
            Self::NotAnObject { .. } => None,
        }
    }
}

impl fmt::Display for OptionsError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOption { name, suggestion } => {
                write!(formatter, "{name} is not a valid connection option")?;
                if let Some(suggestion) = suggestion {
                    write!(formatter, " (did you mean {suggestion}?)")?;
                }
                Ok(())
            },
            Self::InvalidValue { name, reason } => {
                write!(formatter, "invalid value for {name}: {reason}")
            },
            Self::TypeMismatch { found } => write!(
                formatter,
                "type must be \"{}\", found {found}",
                crate::names::DRIVER_TYPE
            ),
            Self::NotAnObject { found } => {
                write!(formatter, "connection options must be an object, found {found}")
            },
        }
    }
}

impl std::error::Error for OptionsError {}

impl From<OptionsError> for ErrorEnvelope {
    fn from(error: OptionsError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            OptionsError::UnknownOption { name, suggestion } => envelope
                .with_metadata("option", name)
                .with_optional_metadata("suggestion", suggestion),
            OptionsError::InvalidValue { name, .. } => envelope.with_metadata("option", name),
            OptionsError::TypeMismatch { found } => envelope
                .with_metadata("option", crate::names::TYPE)
                .with_metadata("found", found),
            OptionsError::NotAnObject { found } => envelope.with_metadata("found", found),
        }
    }
}
