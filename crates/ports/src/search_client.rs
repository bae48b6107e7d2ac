//! Search client boundary contract.
//!
//! The wrapped client library is consumed through these traits only. The
//! driver never constructs a client itself; it asks a factory for one.

use crate::BoxFuture;
use esbridge_config::ClientConfig;
use esbridge_shared::Result;
use std::sync::Arc;

/// A live search client built from a [`ClientConfig`].
///
/// Query execution is out of scope here. The driver only needs liveness and
/// shutdown.
pub trait SearchClientPort: Send + Sync {
    /// Endpoint the client talks to, without credentials.
    fn node(&self) -> &str;

    /// Check that the node answers.
    fn ping(&self) -> BoxFuture<'_, Result<()>>;

    /// Release the client's resources. Later calls fail.
    fn close(&self) -> BoxFuture<'_, Result<()>>;
}

/// Builds search clients from client configs.
pub trait SearchClientFactory: Send + Sync {
    /// Name of the client package this factory provides.
    fn package_name(&self) -> &str;

    /// Construct a client. Construction does not touch the network.
    fn create(&self, config: &ClientConfig) -> Result<Arc<dyn SearchClientPort>>;
}
