//! One immutable pool generation.

use std::sync::Arc;

use crate::node::Node;

/// Protocol nodes and HTTP endpoints built from one config snapshot.
///
/// Never mutated after construction; the manager replaces it wholesale.
#[derive(Debug, Default)]
pub struct NodePool {
    generation: u64,
    nodes: Vec<Arc<Node>>,
    http_nodes: Vec<String>,
}

impl NodePool {
    pub fn new(generation: u64, nodes: Vec<Arc<Node>>, http_nodes: Vec<String>) -> Self {
        Self {
            generation,
            nodes,
            http_nodes,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn http_nodes(&self) -> &[String] {
        &self.http_nodes
    }

    /// Nodes that are enabled and outside their danger zone, in pool order.
    pub fn eligible_nodes(&self) -> Vec<&Arc<Node>> {
        self.nodes.iter().filter(|n| n.is_eligible()).collect()
    }
}
