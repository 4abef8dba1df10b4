//! A pooled protocol-level node.

use std::fmt;

use tracing::warn;

use espool_core::{HealthPolicy, NodeDefinition};
use espool_health::{NodeHealth, Outcome, Transition};

/// One protocol node of a single pool generation.
///
/// Nodes are handed out as `Arc<Node>`; identity is pointer identity.
/// A reload builds fresh nodes, so health never carries across
/// generations. Outcomes reported on a node from a discarded generation
/// land in that orphaned node and are dropped with it.
#[derive(Debug)]
pub struct Node {
    definition: NodeDefinition,
    generation: u64,
    health: NodeHealth,
}

impl Node {
    pub fn new(definition: NodeDefinition, generation: u64, policy: HealthPolicy) -> Self {
        let health = NodeHealth::new(definition.enabled, policy);
        Self {
            definition,
            generation,
            health,
        }
    }

    pub fn host(&self) -> &str {
        &self.definition.host
    }

    pub fn port(&self) -> i32 {
        self.definition.port
    }

    /// Pool generation this node was built for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn health(&self) -> &NodeHealth {
        &self.health
    }

    pub fn enabled(&self) -> bool {
        self.health.enabled()
    }

    pub fn in_danger_zone(&self) -> bool {
        self.health.in_danger_zone()
    }

    pub fn is_eligible(&self) -> bool {
        self.health.is_eligible()
    }

    /// Report the outcome of a request sent to this node.
    pub fn record(&self, outcome: Outcome) -> Transition {
        let transition = self.health.record(outcome);
        if transition == Transition::Entered {
            warn!(
                node = %self,
                generation = self.generation,
                "node entered danger zone on failures"
            );
        }
        transition
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.definition.host.trim(), self.definition.port)
    }
}
