//! Client config parser.
//!
//! A `ClientConfig` is one complete snapshot of the cluster topology:
//! protocol nodes, HTTP nodes, the danger-zone policy and the tick period.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::types::NodeDefinition;

const DEFAULT_TICK_INTERVAL: &str = "10s";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub http_nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub health: HealthPolicy,
    #[serde(default = "default_tick_interval")]
    pub tick_interval: String,
}

/// Thresholds that move a node in and out of its danger zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthPolicy {
    /// Failures within one window that trip the node immediately.
    pub failure_threshold: u32,
    /// Window failure ratio that trips the node at tick time.
    pub failure_ratio: f64,
    /// Minimum window volume before the ratio is evaluated.
    pub min_requests: u32,
    /// Ticks a tripped node sits out before it is eligible again.
    pub cooldown_ticks: u32,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            failure_ratio: 0.5,
            min_requests: 4,
            cooldown_ticks: 3,
        }
    }
}

impl HealthPolicy {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.failure_threshold == 0 {
            return Err(ConfigError::Invalid(
                "health.failure_threshold must be at least 1".to_string(),
            ));
        }
        if !(self.failure_ratio > 0.0 && self.failure_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "health.failure_ratio must be in (0, 1], got {}",
                self.failure_ratio
            )));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            http_nodes: Vec::new(),
            health: HealthPolicy::default(),
            tick_interval: default_tick_interval(),
        }
    }
}

impl ClientConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the policy and tick period. Node definitions are passed
    /// through untouched; an empty host is not an error here.
    pub fn validate(&self) -> ConfigResult<()> {
        self.health.validate()?;
        self.tick_interval()?;
        Ok(())
    }

    pub fn tick_interval(&self) -> ConfigResult<Duration> {
        match parse_duration(&self.tick_interval) {
            Some(d) if !d.is_zero() => Ok(d),
            _ => Err(ConfigError::Invalid(format!(
                "tick_interval {:?} is not a positive duration",
                self.tick_interval
            ))),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<NodeDefinition>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_http_nodes(mut self, http_nodes: Vec<NodeDefinition>) -> Self {
        self.http_nodes = http_nodes;
        self
    }

    pub fn with_health(mut self, health: HealthPolicy) -> Self {
        self.health = health;
        self
    }
}

fn default_tick_interval() -> String {
    DEFAULT_TICK_INTERVAL.to_string()
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok()?.checked_mul(60).map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
