//! # esbridge-adapters
//!
//! The search driver, the client package registry, and the adapters behind
//! the ports: an HTTP search client and a JSON lines logger.
//! This crate depends on `ports`, `config`, and `shared`.

pub mod driver;
/// `reqwest`-backed search client.
#[cfg(feature = "http-client")]
pub mod http;
pub mod log_sink;
pub mod logger;
pub mod registry;

pub use driver::{
    CLIENT_PACKAGE, ColumnSpec, DRIVER_NAME, DriverCapabilities, DriverError, QueryRunner,
    SchemaBuilder, SearchDriver,
};
#[cfg(feature = "http-client")]
pub use http::{HttpClientFactory, HttpSearchClient};
pub use log_sink::{LogSink, MemorySink, StderrLogSink};
pub use logger::JsonLogger;
pub use registry::ClientRegistry;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
