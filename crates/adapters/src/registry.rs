//! Client package registry.
//!
//! The driver never links a client library directly. It asks the registry for
//! a factory by package name; a missing package is a dependency error raised
//! at driver construction.

use crate::driver::DriverError;
use esbridge_ports::SearchClientFactory;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Client factories keyed by package name.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    factories: BTreeMap<String, Arc<dyn SearchClientFactory>>,
}

impl ClientRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every client compiled into this crate.
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        #[cfg(feature = "http-client")]
        let registry = registry.with_factory(Arc::new(crate::http::HttpClientFactory));
        registry
    }

    /// Add a factory and return the registry.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn SearchClientFactory>) -> Self {
        self.register(factory);
        self
    }

    /// Add a factory, replacing any factory with the same package name.
    pub fn register(&mut self, factory: Arc<dyn SearchClientFactory>) {
        let package = factory.package_name().to_owned();
        if self.factories.insert(package.clone(), factory).is_some() {
            tracing::debug!(package = %package, "client factory replaced");
        }
    }

    /// Look up the factory for `package` on behalf of `driver`.
    pub fn load(
        &self,
        package: &str,
        driver: &'static str,
    ) -> Result<Arc<dyn SearchClientFactory>, DriverError> {
        self.factories.get(package).cloned().ok_or_else(|| {
            DriverError::DependencyUnavailable {
                driver,
                package: package.to_owned(),
            }
        })
    }

    /// Registered package names, sorted.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_list()
            .entries(self.package_names())
            .finish()
    }
}
