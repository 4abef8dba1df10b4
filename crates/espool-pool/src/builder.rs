//! Endpoint builder: node definitions in, pool members out.
//!
//! Pure functions with no shared state. Definitions are read, never
//! rewritten; the HTTP default port is applied to the output string only.

use std::sync::Arc;

use espool_core::{ClientConfig, HealthPolicy, NodeDefinition};

use crate::node::Node;
use crate::pool::NodePool;

/// Port used for HTTP endpoints whose definition leaves it unset.
pub const DEFAULT_HTTP_PORT: i32 = 80;

/// One node per definition, in input order.
///
/// Disabled definitions still become nodes; they are filtered out at
/// selection time by the eligibility predicate.
pub fn build_nodes(
    definitions: &[NodeDefinition],
    generation: u64,
    policy: &HealthPolicy,
) -> Vec<Arc<Node>> {
    definitions
        .iter()
        .map(|def| Arc::new(Node::new(def.clone(), generation, policy.clone())))
        .collect()
}

/// `http://<host>:<port>` for every enabled definition, in input order.
///
/// Disabled definitions are omitted. A port of zero or below becomes
/// [`DEFAULT_HTTP_PORT`]; the host is trimmed but otherwise unchecked.
pub fn build_http_nodes(definitions: &[NodeDefinition]) -> Vec<String> {
    definitions
        .iter()
        .filter(|def| def.enabled)
        .map(|def| {
            let port = if def.has_port() {
                def.port
            } else {
                DEFAULT_HTTP_PORT
            };
            format!("http://{}:{}", def.host.trim(), port)
        })
        .collect()
}

/// Build a complete pool generation from one config snapshot.
pub fn build_pool(config: &ClientConfig, generation: u64) -> NodePool {
    NodePool::new(
        generation,
        build_nodes(&config.nodes, generation, &config.health),
        build_http_nodes(&config.http_nodes),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(host: &str, port: i32, enabled: bool) -> NodeDefinition {
        NodeDefinition::new(host, port, enabled)
    }

    #[test]
    fn http_node_with_port() {
        assert_eq!(
            build_http_nodes(&[def("a", 9200, true)]),
            vec!["http://a:9200"]
        );
    }

    #[test]
    fn http_node_default_port() {
        assert_eq!(build_http_nodes(&[def("b", 0, true)]), vec!["http://b:80"]);
        assert_eq!(build_http_nodes(&[def("b", -5, true)]), vec!["http://b:80"]);
    }

    #[test]
    fn http_node_disabled_is_omitted() {
        assert!(build_http_nodes(&[def("c", 9201, false)]).is_empty());
    }

    #[test]
    fn http_nodes_keep_order_and_trim() {
        let defs = [
            def("  a ", 9200, true),
            def("skip", 9200, false),
            def("b\t", 0, true),
        ];
        assert_eq!(build_http_nodes(&defs), vec!["http://a:9200", "http://b:80"]);
    }

    #[test]
    fn http_nodes_do_not_rewrite_definitions() {
        let defs = [def("b", 0, true)];
        build_http_nodes(&defs);
        assert_eq!(defs[0].port, 0);
    }

    #[test]
    fn empty_host_passes_through() {
        assert_eq!(build_http_nodes(&[def("", 9200, true)]), vec!["http://:9200"]);
    }

    #[test]
    fn nodes_keep_order_and_disabled_entries() {
        let defs = [def("a", 9500, true), def("b", 9500, false), def("c", 0, true)];
        let nodes = build_nodes(&defs, 7, &HealthPolicy::default());

        let hosts: Vec<&str> = nodes.iter().map(|n| n.host()).collect();
        assert_eq!(hosts, vec!["a", "b", "c"]);
        assert!(!nodes[1].enabled());
        assert!(nodes.iter().all(|n| n.generation() == 7));
    }

    #[test]
    fn empty_definitions_yield_empty() {
        assert!(build_nodes(&[], 1, &HealthPolicy::default()).is_empty());
        assert!(build_http_nodes(&[]).is_empty());
    }

    #[test]
    fn build_pool_uses_both_lists() {
        let config = ClientConfig::default()
            .with_nodes(vec![def("t1", 9500, true)])
            .with_http_nodes(vec![def("h1", 9200, true), def("h2", 9200, false)]);

        let pool = build_pool(&config, 3);
        assert_eq!(pool.generation(), 3);
        assert_eq!(pool.nodes().len(), 1);
        assert_eq!(pool.http_nodes().to_vec(), vec!["http://h1:9200"]);
    }
}
