//! Driver error taxonomy.

use esbridge_config::OptionsError;
use esbridge_shared::{ErrorCode, ErrorEnvelope};
use thiserror::Error;

/// Failures raised by [`crate::driver::SearchDriver`].
///
/// All of them are raised synchronously by the call that detects them and
/// none is retried by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// Options failed name validation or typing.
    #[error(transparent)]
    Configuration(#[from] OptionsError),

    /// The client package is not registered.
    #[error("{driver} driver requires the {package} client package, which is not available")]
    DependencyUnavailable {
        /// Driver name.
        driver: &'static str,
        /// Client package that was looked up.
        package: String,
    },

    /// An operation needs an active connection and there is none.
    #[error("{driver} driver is not connected")]
    NotConnected {
        /// Driver name.
        driver: &'static str,
    },

    /// The operation does not exist for this driver.
    #[error("{operation} is not supported by the {driver} driver: {reason}")]
    UnsupportedOperation {
        /// Driver name.
        driver: &'static str,
        /// Operation name.
        operation: &'static str,
        /// Why it is unsupported.
        reason: &'static str,
    },

    /// The wrapped client failed.
    #[error("{0}")]
    Client(ErrorEnvelope),
}

impl From<DriverError> for ErrorEnvelope {
    fn from(error: DriverError) -> Self {
        let message = error.to_string();
        match error {
            DriverError::Configuration(error) => error.into(),
            DriverError::DependencyUnavailable { driver, package } => Self::expected(
                ErrorCode::new("driver", "dependency_unavailable"),
                message,
            )
            .with_metadata("driver", driver)
            .with_metadata("package", package),
            DriverError::NotConnected { driver } => {
                Self::expected(ErrorCode::new("driver", "not_connected"), message)
                    .with_metadata("driver", driver)
            },
            DriverError::UnsupportedOperation {
                driver, operation, ..
            } => Self::expected(ErrorCode::new("driver", "unsupported_operation"), message)
                .with_metadata("driver", driver)
                .with_metadata("operation", operation),
            DriverError::Client(envelope) => envelope,
        }
    }
}
