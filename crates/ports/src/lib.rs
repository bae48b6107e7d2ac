//! # esbridge-ports
//!
//! Port traits between the esbridge driver and the outside world: the wrapped
//! search client and structured logging. It depends only on `config` and
//! `shared`.

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by port traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod logger;
pub mod search_client;

pub use logger::*;
pub use search_client::*;

// Re-export the config types used in port signatures, so adapter crates can
// implement ports without naming `esbridge-config` for them.
pub use esbridge_config::{AuthDescriptor, ClientConfig, TlsDescriptor, TlsSettings};

#[cfg(test)]
mod tests {
    use super::*;
    use esbridge_config::config_crate_version;
    use esbridge_shared::shared_crate_version;

    fn workspace_deps() -> Vec<String> {
        let cargo_toml = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let mut deps = Vec::new();
        let mut in_deps = false;

        for raw_line in cargo_toml.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                in_deps = line == "[dependencies]" || line == "[dev-dependencies]";
                continue;
            }
            if in_deps && line.starts_with("esbridge-") {
                let key = line.split('=').next().unwrap_or("").trim();
                let name = key.split('.').next().unwrap_or("").trim();
                deps.push(name.to_string());
            }
        }

        deps
    }

    #[test]
    fn ports_depends_only_on_config_and_shared() {
        let deps = workspace_deps();
        let allowed = ["esbridge-config", "esbridge-shared"];

        for dep in &deps {
            assert!(
                allowed.contains(&dep.as_str()),
                "unexpected dependency found: {dep}"
            );
        }

        for expected in allowed {
            assert!(
                deps.iter().any(|dep| dep == expected),
                "missing dependency: {expected}"
            );
        }
    }

    #[test]
    fn ports_crate_compiles() {
        assert!(!ports_crate_version().is_empty());
        assert!(!config_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }

    #[test]
    fn log_levels_order_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Warn);
        assert_eq!(LogLevel::Error.as_str(), "error");
        let event = LogEvent::new(LogLevel::Info, "driver.connect", "connected");
        assert_eq!(&*event.event, "driver.connect");
        assert!(event.fields.is_none());
    }
}
