//! Node routing capabilities: filter and selector.
//!
//! Declarative sources (JSON, TOML, env) can only name a built-in strategy.
//! Custom behavior is injected programmatically through [`FilterNodes`] and
//! [`SelectNode`].

use serde::{Deserialize, Deserializer, de};
use std::fmt;
use std::sync::Arc;

/// A cluster node as seen by routing capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Node base URL.
    pub url: String,
    /// Roles advertised by the node (`master`, `data`, `ingest`, ...).
    pub roles: Vec<String>,
}

impl NodeDescriptor {
    /// Create a descriptor for `url` with the given roles.
    pub fn new(url: impl Into<String>, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            url: url.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true when `role` is advertised by the node.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|candidate| candidate == role)
    }

    /// Returns true when the node only serves as a dedicated master.
    #[must_use]
    pub fn is_dedicated_master(&self) -> bool {
        self.has_role("master")
            && !self.has_role("data")
            && !self.has_role("ingest")
            && !self.has_role("ml")
    }
}

/// Custom per-node eligibility predicate.
pub trait FilterNodes: Send + Sync {
    /// Returns true when `node` may receive requests.
    fn accepts(&self, node: &NodeDescriptor) -> bool;
}

impl<F> FilterNodes for F
where
    F: Fn(&NodeDescriptor) -> bool + Send + Sync,
{
    fn accepts(&self, node: &NodeDescriptor) -> bool {
        self(node)
    }
}

/// Custom selection over the active connection set.
pub trait SelectNode: Send + Sync {
    /// Pick the index of the node to use from `nodes`, or `None` when none fits.
    fn select(&self, nodes: &[NodeDescriptor]) -> Option<usize>;
}

impl<F> SelectNode for F
where
    F: Fn(&[NodeDescriptor]) -> Option<usize> + Send + Sync,
{
    fn select(&self, nodes: &[NodeDescriptor]) -> Option<usize> {
        self(nodes)
    }
}

/// Which nodes may receive requests.
#[derive(Clone, Default)]
pub enum NodeFilter {
    /// Every node except dedicated masters.
    #[default]
    Default,
    /// Every node.
    Any,
    /// Caller-supplied predicate.
    Custom(Arc<dyn FilterNodes>),
}

impl NodeFilter {
    /// Wrap a custom predicate.
    pub fn custom(filter: impl FilterNodes + 'static) -> Self {
        Self::Custom(Arc::new(filter))
    }

    /// Returns true when `node` may receive requests.
    #[must_use]
    pub fn accepts(&self, node: &NodeDescriptor) -> bool {
        match self {
            Self::Default => !node.is_dedicated_master(),
            Self::Any => true,
            Self::Custom(filter) => filter.accepts(node),
        }
    }

    /// Stable label used in logs and redacted dumps.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Any => "any",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for NodeFilter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "NodeFilter({})", self.label())
    }
}

impl PartialEq for NodeFilter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Default, Self::Default) | (Self::Any, Self::Any) => true,
            (Self::Custom(left), Self::Custom(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for NodeFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        match label.as_str() {
            "default" => Ok(Self::Default),
            "any" => Ok(Self::Any),
            other => Err(de::Error::unknown_variant(other, &["default", "any"])),
        }
    }
}

/// How the wrapped client picks a node for each request.
#[derive(Clone, Default)]
pub enum NodeSelector {
    /// Rotate through the eligible nodes.
    #[default]
    RoundRobin,
    /// Pick a random eligible node.
    Random,
    /// Caller-supplied selection over the active connection set.
    Custom(Arc<dyn SelectNode>),
}

impl NodeSelector {
    /// Wrap a custom selector.
    pub fn custom(selector: impl SelectNode + 'static) -> Self {
        Self::Custom(Arc::new(selector))
    }

    /// Stable label used in logs and redacted dumps.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round-robin",
            Self::Random => "random",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for NodeSelector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "NodeSelector({})", self.label())
    }
}

impl PartialEq for NodeSelector {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::RoundRobin, Self::RoundRobin) | (Self::Random, Self::Random) => true,
            (Self::Custom(left), Self::Custom(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for NodeSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        match label.as_str() {
            "round-robin" => Ok(Self::RoundRobin),
            "random" => Ok(Self::Random),
            other => Err(de::Error::unknown_variant(other, &["round-robin", "random"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> NodeDescriptor {
        NodeDescriptor::new("http://m:9200", ["master"])
    }

    fn data() -> NodeDescriptor {
        NodeDescriptor::new("http://d:9200", ["master", "data"])
    }

    #[test]
    fn default_filter_skips_dedicated_masters() {
        assert!(!NodeFilter::Default.accepts(&master()));
        assert!(NodeFilter::Default.accepts(&data()));
        assert!(NodeFilter::Any.accepts(&master()));
    }

    #[test]
    fn custom_filter_is_called() {
        let filter = NodeFilter::custom(|node: &NodeDescriptor| node.url.contains("://d"));
        assert!(filter.accepts(&data()));
        assert!(!filter.accepts(&master()));
        assert_eq!(filter.label(), "custom");
    }

    #[test]
    fn custom_selector_sees_the_active_set() -> Result<(), &'static str> {
        let selector = NodeSelector::custom(|nodes: &[NodeDescriptor]| {
            nodes.iter().position(|node| node.has_role("data"))
        });
        let NodeSelector::Custom(inner) = &selector else {
            return Err("expected custom selector");
        };
        assert_eq!(inner.select(&[master(), data()]), Some(1));
        assert_eq!(inner.select(&[master()]), None);
        Ok(())
    }

    #[test]
    fn custom_capabilities_compare_by_identity() {
        let filter = NodeFilter::custom(|_: &NodeDescriptor| true);
        let same = filter.clone();
        let other = NodeFilter::custom(|_: &NodeDescriptor| true);
        assert_eq!(filter, same);
        assert_ne!(filter, other);
        assert_ne!(NodeFilter::Any, NodeFilter::Default);
    }

    #[test]
    fn named_strategies_deserialize_from_labels() -> Result<(), serde_json::Error> {
        let filter: NodeFilter = serde_json::from_str("\"any\"")?;
        assert_eq!(filter, NodeFilter::Any);
        let selector: NodeSelector = serde_json::from_str("\"random\"")?;
        assert_eq!(selector, NodeSelector::Random);

        assert!(serde_json::from_str::<NodeSelector>("\"fastest\"").is_err());
        assert!(serde_json::from_str::<NodeFilter>("true").is_err());
        Ok(())
    }
}
