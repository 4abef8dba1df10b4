//! Node definitions as supplied by the configuration source.

use serde::{Deserialize, Serialize};

/// One cluster endpoint as written in the client config.
///
/// A `port` of zero or below means "unset"; consumers pick their own
/// default. Definitions are never mutated after they are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub host: String,
    #[serde(default)]
    pub port: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl NodeDefinition {
    pub fn new(host: impl Into<String>, port: i32, enabled: bool) -> Self {
        Self {
            host: host.into(),
            port,
            enabled,
        }
    }

    /// Whether an explicit port was configured.
    pub fn has_port(&self) -> bool {
        self.port > 0
    }
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_defaults_to_true() {
        let def: NodeDefinition = toml::from_str(r#"host = "a""#).unwrap();
        assert!(def.enabled);
        assert_eq!(def.port, 0);
        assert!(!def.has_port());
    }

    #[test]
    fn negative_port_is_unset() {
        let def = NodeDefinition::new("a", -1, true);
        assert!(!def.has_port());
        assert!(NodeDefinition::new("a", 9200, true).has_port());
    }
}
