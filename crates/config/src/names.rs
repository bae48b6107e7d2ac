//! Recognized connection option names.
//!
//! This list is part of the public contract: every name here has a field on
//! [`crate::ConnectionOptions`] (or is the `type` tag) and vice versa.

/// Driver tag expected in the `type` option.
pub const DRIVER_TYPE: &str = "elasticsearch";

/// Driver tag field. Validated, never forwarded.
pub const TYPE: &str = "type";
/// Fully qualified endpoint URL.
pub const URL: &str = "url";
/// Forward proxy endpoint.
pub const PROXY: &str = "proxy";
/// Endpoint host.
pub const HOST: &str = "host";
/// Endpoint port.
pub const PORT: &str = "port";
/// API key token or credential object.
pub const API_KEY: &str = "apiKey";
/// Basic-auth username.
pub const USERNAME: &str = "username";
/// Basic-auth password.
pub const PASSWORD: &str = "password";
/// Retry budget of the wrapped client.
pub const MAX_RETRIES: &str = "maxRetries";
/// Request timeout in milliseconds.
pub const REQUEST_TIMEOUT_MS: &str = "requestTimeoutMS";
/// Ping timeout in milliseconds.
pub const PING_TIMEOUT_MS: &str = "pingTimeoutMS";
/// Node resurrection strategy.
pub const RESURRECT_STRATEGY: &str = "resurrectStrategy";
/// Adds an `accept-encoding` header to every request.
pub const SUGGEST_COMPRESSION: &str = "suggestCompression";
/// Request body compression.
pub const COMPRESSION: &str = "compression";
/// TLS master switch.
pub const SSL: &str = "ssl";
/// Validate the server certificate.
pub const SSL_VALIDATE: &str = "sslValidate";
/// Trusted certificate authorities.
pub const SSL_CA: &str = "sslCA";
/// Client certificate.
pub const SSL_CERT: &str = "sslCert";
/// Client private key.
pub const SSL_KEY: &str = "sslKey";
/// Client private key passphrase.
pub const SSL_PASS: &str = "sslPass";
/// Certificate revocation list.
pub const SSL_CRL: &str = "sslCRL";
/// Per-node routing eligibility.
pub const NODE_FILTER: &str = "nodeFilter";
/// Node selection strategy.
pub const NODE_SELECTOR: &str = "nodeSelector";
/// Client instance identifier used in lifecycle events.
pub const NAME: &str = "name";

/// Every recognized option name, `type` included.
pub const OPTION_NAMES: [&str; 24] = [
    TYPE,
    URL,
    PROXY,
    HOST,
    PORT,
    API_KEY,
    USERNAME,
    PASSWORD,
    MAX_RETRIES,
    REQUEST_TIMEOUT_MS,
    PING_TIMEOUT_MS,
    RESURRECT_STRATEGY,
    SUGGEST_COMPRESSION,
    COMPRESSION,
    SSL,
    SSL_VALIDATE,
    SSL_CA,
    SSL_CERT,
    SSL_KEY,
    SSL_PASS,
    SSL_CRL,
    NODE_FILTER,
    NODE_SELECTOR,
    NAME,
];

/// Names consumed into the endpoint.
pub const ENDPOINT_SOURCE_NAMES: [&str; 3] = [URL, HOST, PORT];

/// Names consumed into the auth descriptor.
pub const AUTH_SOURCE_NAMES: [&str; 3] = [API_KEY, USERNAME, PASSWORD];

/// Names consumed into the TLS descriptor. `ssl` also picks the endpoint scheme.
pub const TLS_SOURCE_NAMES: [&str; 7] = [
    SSL,
    SSL_VALIDATE,
    SSL_CA,
    SSL_CERT,
    SSL_KEY,
    SSL_PASS,
    SSL_CRL,
];

/// Names forwarded verbatim in the residual bag.
pub const RESIDUAL_NAMES: [&str; 10] = [
    PROXY,
    MAX_RETRIES,
    REQUEST_TIMEOUT_MS,
    PING_TIMEOUT_MS,
    RESURRECT_STRATEGY,
    SUGGEST_COMPRESSION,
    COMPRESSION,
    NODE_FILTER,
    NODE_SELECTOR,
    NAME,
];

/// Returns the canonical static name when `name` is recognized.
pub fn recognized(name: &str) -> Option<&'static str> {
    OPTION_NAMES.iter().copied().find(|known| *known == name)
}

/// Returns true when `name` is a recognized option name.
pub fn is_recognized(name: &str) -> bool {
    recognized(name).is_some()
}

/// Finds the recognized name a mistyped key most likely meant.
///
/// Matches after ASCII case folding and dropping `_`, `-` and `.`, so
/// `ssl_ca`, `SSL-CA` and `sslca` all point at `sslCA`.
pub fn suggest(name: &str) -> Option<&'static str> {
    let wanted = fold(name);
    if wanted.is_empty() {
        return None;
    }
    OPTION_NAMES
        .iter()
        .copied()
        .find(|known| fold(known) == wanted)
}

fn fold(name: &str) -> String {
    name.chars()
        .filter(|ch| !matches!(ch, '_' | '-' | '.'))
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}
