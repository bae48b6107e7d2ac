//! Search driver lifecycle.
//!
//! `SearchDriver` validates connection options when it is created, builds a
//! client config on `connect`, and holds at most one query runner until
//! `disconnect`.

pub mod error;
pub mod schema;

pub use error::DriverError;
pub use schema::{ColumnSpec, DriverCapabilities, SchemaBuilder};

use crate::registry::ClientRegistry;
use esbridge_config::{
    ClientConfig, ConnectionOptions, RawOptions, UnknownOptionPolicy, build_client_config,
    names, sanitize_url, validate_names,
};
use esbridge_ports::{LogFields, LoggerPort, SearchClientFactory, SearchClientPort};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Driver name used in errors and log events.
pub const DRIVER_NAME: &str = "elasticsearch";

/// Registry key of the client package the driver loads.
pub const CLIENT_PACKAGE: &str = "elasticsearch";

/// Client name reported when the `name` option is absent.
pub const DEFAULT_CLIENT_NAME: &str = "default";

/// Handle to the live client of a connected driver.
#[derive(Clone)]
pub struct QueryRunner {
    client: Arc<dyn SearchClientPort>,
    config: Arc<ClientConfig>,
}

impl QueryRunner {
    /// The wrapped client.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn SearchClientPort> {
        &self.client
    }

    /// Config the client was built from.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check that the node answers.
    pub async fn ping(&self) -> Result<(), DriverError> {
        self.client.ping().await.map_err(DriverError::Client)
    }
}

impl fmt::Debug for QueryRunner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("QueryRunner")
            .field("node", &self.client.node())
            .finish_non_exhaustive()
    }
}

/// Lifecycle wrapper around the wrapped search client.
pub struct SearchDriver {
    options: ConnectionOptions,
    factory: Arc<dyn SearchClientFactory>,
    logger: Option<Arc<dyn LoggerPort>>,
    query_runner: Option<QueryRunner>,
}

impl SearchDriver {
    /// Validate raw options and load the client package.
    ///
    /// Unknown option names are rejected. Fails with
    /// [`DriverError::DependencyUnavailable`] when the registry has no client
    /// package for this driver.
    pub fn new(raw: &RawOptions, registry: &ClientRegistry) -> Result<Self, DriverError> {
        Self::with_policy(raw, registry, UnknownOptionPolicy::Reject)
    }

    /// Like [`SearchDriver::new`] with an explicit unknown-option policy.
    ///
    /// With [`UnknownOptionPolicy::Warn`], unknown keys are logged and
    /// dropped before the options are typed.
    pub fn with_policy(
        raw: &RawOptions,
        registry: &ClientRegistry,
        policy: UnknownOptionPolicy,
    ) -> Result<Self, DriverError> {
        validate_names(raw.keys().map(String::as_str), policy)?;

        let recognized: RawOptions = raw
            .iter()
            .filter(|(name, _)| names::is_recognized(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let options = ConnectionOptions::from_raw(&recognized)?;

        Self::from_options(options, registry)
    }

    /// Build a driver from already typed options.
    pub fn from_options(
        options: ConnectionOptions,
        registry: &ClientRegistry,
    ) -> Result<Self, DriverError> {
        validate_names(
            options.present_option_names(),
            UnknownOptionPolicy::Reject,
        )?;
        let factory = registry.load(CLIENT_PACKAGE, DRIVER_NAME)?;
        tracing::debug!(
            driver = DRIVER_NAME,
            package = factory.package_name(),
            "client package loaded"
        );

        Ok(Self {
            options,
            factory,
            logger: None,
            query_runner: None,
        })
    }

    /// Attach a structured logger for lifecycle events.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn LoggerPort>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Typed options the driver was created with.
    #[must_use]
    pub const fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Name reported in lifecycle events.
    #[must_use]
    pub fn client_name(&self) -> &str {
        self.options.name.as_deref().unwrap_or(DEFAULT_CLIENT_NAME)
    }

    /// Returns true while a query runner is held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.query_runner.is_some()
    }

    /// Build the client config and create the client.
    ///
    /// Option names are validated again first. Connecting while already
    /// connected replaces the held runner; the previous client is dropped
    /// without being closed.
    pub fn connect(&mut self) -> Result<(), DriverError> {
        validate_names(
            self.options.present_option_names(),
            UnknownOptionPolicy::Reject,
        )?;
        self.log_debug(
            "driver.validate",
            "connection options validated",
            &[(
                "optionCount",
                Value::from(self.options.present_option_names().len()),
            )],
        );

        let config = build_client_config(&self.options);
        let node = sanitize_url(&config.node);
        let tls = config.ssl.is_enabled();

        let client = match self.factory.create(&config) {
            Ok(client) => client,
            Err(error) => {
                self.log_connect_failure(&error);
                return Err(DriverError::Client(error));
            },
        };

        if self.query_runner.is_some() {
            tracing::warn!(
                driver = DRIVER_NAME,
                client = self.client_name(),
                "replacing an existing connection"
            );
        }
        self.query_runner = Some(QueryRunner {
            client,
            config: Arc::new(config),
        });

        self.log_info(
            "driver.connect",
            "connected",
            &[("node", Value::from(node)), ("tls", Value::from(tls))],
        );
        Ok(())
    }

    /// Close the client and release the query runner.
    ///
    /// The runner is released even when closing the client fails.
    pub async fn disconnect(&mut self) -> Result<(), DriverError> {
        let Some(runner) = self.query_runner.take() else {
            return Err(DriverError::NotConnected {
                driver: DRIVER_NAME,
            });
        };

        let result = runner.client.close().await.map_err(DriverError::Client);
        self.log_info(
            "driver.disconnect",
            "disconnected",
            &[("clean", Value::from(result.is_ok()))],
        );
        result
    }

    /// Query runner of the active connection.
    pub fn create_query_runner(&self) -> Result<QueryRunner, DriverError> {
        self.query_runner
            .clone()
            .ok_or(DriverError::NotConnected {
                driver: DRIVER_NAME,
            })
    }

    fn event_fields(&self, extra: &[(&str, Value)]) -> LogFields {
        let mut fields = LogFields::new();
        fields.insert("driver".into(), Value::from(DRIVER_NAME));
        fields.insert("clientName".into(), Value::from(self.client_name()));
        for (key, value) in extra {
            fields.insert((*key).into(), value.clone());
        }
        fields
    }

    fn log_debug(&self, event: &str, message: &str, extra: &[(&str, Value)]) {
        if let Some(logger) = &self.logger {
            logger.debug(event, message, Some(self.event_fields(extra)));
        }
    }

    fn log_info(&self, event: &str, message: &str, extra: &[(&str, Value)]) {
        if let Some(logger) = &self.logger {
            logger.info(event, message, Some(self.event_fields(extra)));
        }
    }

    fn log_connect_failure(&self, error: &esbridge_shared::ErrorEnvelope) {
        if let Some(logger) = &self.logger {
            logger.error(
                "driver.connect_failed",
                "client creation failed",
                Some(self.event_fields(&[])),
                serde_json::to_value(error).ok(),
            );
        }
    }
}

impl fmt::Debug for SearchDriver {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SearchDriver")
            .field("client_name", &self.client_name())
            .field("package", &self.factory.package_name())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
