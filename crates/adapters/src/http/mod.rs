//! HTTP search client built on `reqwest`.
//!
//! Talks to a single node. Construction validates the config and builds the
//! connection pool without sending anything; `ping` issues `HEAD /`.

mod auth;
mod error;
mod tls;

pub use auth::build_auth_header;

use crate::driver::CLIENT_PACKAGE;
use error::{closed_error, init_error, status_error, timeout_error, transport_error};
use esbridge_config::{ClientConfig, Compression, sanitize_url};
use esbridge_ports::{BoxFuture, SearchClientFactory, SearchClientPort};
use esbridge_shared::Result;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Factory registered under the `elasticsearch` package name.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpClientFactory;

impl SearchClientFactory for HttpClientFactory {
    fn package_name(&self) -> &str {
        CLIENT_PACKAGE
    }

    fn create(&self, config: &ClientConfig) -> Result<Arc<dyn SearchClientPort>> {
        Ok(Arc::new(HttpSearchClient::new(config)?))
    }
}

/// Single-node HTTP client.
#[derive(Debug)]
pub struct HttpSearchClient {
    client: reqwest::Client,
    node: reqwest::Url,
    display_node: String,
    ping_timeout: Duration,
    closed: AtomicBool,
}

impl HttpSearchClient {
    /// Build a client from a client config.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let display_node = sanitize_url(&config.node);
        let node = reqwest::Url::parse(&config.node).map_err(|error| {
            init_error(format!("invalid node URL: {error}")).with_metadata("node", &display_node)
        })?;
        if !matches!(node.scheme(), "http" | "https") {
            return Err(init_error("node URL must use http or https")
                .with_metadata("node", display_node));
        }

        let residual = &config.residual;
        let mut headers = HeaderMap::new();
        if let Some(auth) = build_auth_header(&config.auth) {
            let mut value = HeaderValue::from_str(auth.expose()).map_err(|_| {
                init_error("auth header contains invalid characters")
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(residual.effective_request_timeout_ms()))
            .gzip(residual.suggest_compression.unwrap_or(false));

        builder = match residual.proxy.as_deref() {
            Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy).map_err(|error| {
                init_error(format!("invalid proxy: {}", error.without_url()))
                    .with_metadata("proxy", sanitize_url(proxy))
            })?),
            None => builder.no_proxy(),
        };

        if let Some(tls) = config.ssl.descriptor() {
            builder = tls::apply_tls(builder, tls)?;
        }

        log_unapplied_options(config);

        let client = builder
            .build()
            .map_err(|error| init_error(format!("failed to build HTTP client: {error}")))?;

        tracing::debug!(
            node = %display_node,
            tls = config.ssl.is_enabled(),
            "HTTP search client created"
        );

        Ok(Self {
            client,
            node,
            display_node,
            ping_timeout: Duration::from_millis(residual.effective_ping_timeout_ms()),
            closed: AtomicBool::new(false),
        })
    }

    /// Returns true once `close` has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn send_ping(&self) -> Result<()> {
        const OPERATION: &str = "ping";
        if self.is_closed() {
            return Err(closed_error(OPERATION, &self.display_node));
        }

        let request = self
            .client
            .head(self.node.clone())
            .timeout(self.ping_timeout)
            .send();
        let response = match tokio::time::timeout(self.ping_timeout, request).await {
            Ok(result) => {
                result.map_err(|error| transport_error(error, OPERATION, &self.display_node))?
            },
            Err(_) => return Err(timeout_error(OPERATION, &self.display_node)),
        };

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, OPERATION, &self.display_node))
        }
    }
}

impl SearchClientPort for HttpSearchClient {
    fn node(&self) -> &str {
        &self.display_node
    }

    fn ping(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.send_ping())
    }

    fn close(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if self.closed.swap(true, Ordering::AcqRel) {
                return Err(closed_error("close", &self.display_node));
            }
            tracing::debug!(node = %self.display_node, "HTTP search client closed");
            Ok(())
        })
    }
}

/// Options a single-node client forwards nowhere.
fn log_unapplied_options(config: &ClientConfig) {
    let residual = &config.residual;
    let mut unapplied: Vec<&str> = Vec::new();
    if residual.max_retries.is_some() {
        unapplied.push("maxRetries");
    }
    if residual.resurrect_strategy.is_some() {
        unapplied.push("resurrectStrategy");
    }
    if residual.node_filter.is_some() {
        unapplied.push("nodeFilter");
    }
    if residual.node_selector.is_some() {
        unapplied.push("nodeSelector");
    }
    if residual.effective_compression() == Compression::Gzip {
        unapplied.push("compression");
    }
    if !unapplied.is_empty() {
        tracing::debug!(
            options = ?unapplied,
            "options have no effect on a single-node client"
        );
    }
}
