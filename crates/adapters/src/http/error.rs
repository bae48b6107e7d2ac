//! Error mapping for the HTTP client.

use esbridge_shared::{ErrorClass, ErrorCode, ErrorEnvelope};

/// Client construction failed.
pub fn init_error(message: impl Into<String>) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::new("client", "init_failed"), message)
}

/// The client was already closed.
pub fn closed_error(operation: &'static str, node: &str) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::new("client", "closed"), "client is closed")
        .with_metadata("operation", operation)
        .with_metadata("node", node)
}

/// The request did not finish within its deadline.
pub fn timeout_error(operation: &'static str, node: &str) -> ErrorEnvelope {
    ErrorEnvelope::unexpected(
        ErrorCode::new("client", "timeout"),
        format!("{operation} timed out"),
        ErrorClass::Retriable,
    )
    .with_metadata("operation", operation)
    .with_metadata("node", node)
}

/// Map a transport failure. The error text never carries the request URL.
pub fn transport_error(
    error: reqwest::Error,
    operation: &'static str,
    node: &str,
) -> ErrorEnvelope {
    if error.is_timeout() {
        return timeout_error(operation, node);
    }
    let connect = error.is_connect();
    let error = error.without_url();
    let envelope = if connect {
        ErrorEnvelope::unexpected(
            ErrorCode::new("client", "connection"),
            format!("connection failed: {error}"),
            ErrorClass::Retriable,
        )
    } else {
        ErrorEnvelope::unexpected(
            ErrorCode::new("client", "request_failed"),
            format!("request failed: {error}"),
            ErrorClass::NonRetriable,
        )
    };
    envelope
        .with_metadata("operation", operation)
        .with_metadata("node", node)
}

/// Map a non-success HTTP status.
pub fn status_error(
    status: reqwest::StatusCode,
    operation: &'static str,
    node: &str,
) -> ErrorEnvelope {
    let class = if is_retriable_status(status) {
        ErrorClass::Retriable
    } else {
        ErrorClass::NonRetriable
    };
    ErrorEnvelope::unexpected(
        ErrorCode::new("client", "http_status"),
        format!("HTTP {}", status.as_u16()),
        class,
    )
    .with_metadata("http_status", status.as_u16().to_string())
    .with_metadata("operation", operation)
    .with_metadata("node", node)
}

const fn is_retriable_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 502 | 503 | 504)
}
