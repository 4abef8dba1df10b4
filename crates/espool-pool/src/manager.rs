//! Node pool manager: owns the current pool generation.
//!
//! Readers load the current `NodePool` through an `ArcSwap`, so selection
//! never takes a lock shared with reload or tick. A reload builds the next
//! generation off to the side and publishes it with a single store:
//! every reader sees either the old pool or the new one, never a mix.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use tracing::{debug, error, info, warn};

use espool_core::ClientConfig;
use espool_health::Transition;

use crate::builder::build_pool;
use crate::error::{PoolError, PoolResult};
use crate::node::Node;
use crate::pool::NodePool;
use crate::selector::{choose, Selector, ThreadRngSelector};

/// Summary of one `tick()` across the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Generation of the pool that was ticked.
    pub generation: u64,
    /// Nodes that ran an aggregation step.
    pub nodes: usize,
    pub entered: usize,
    pub cleared: usize,
}

/// Coordinates pool generations and node selection.
///
/// Construct one per client and share it behind an `Arc`.
pub struct NodePoolManager {
    pool: ArcSwap<NodePool>,
    selector: Arc<dyn Selector>,
    next_generation: AtomicU64,
    /// Serializes reloads so generations are stored in order.
    reload_lock: Mutex<()>,
}

impl NodePoolManager {
    /// Build the first pool generation from `config`.
    pub fn new(config: &ClientConfig, selector: Arc<dyn Selector>) -> Self {
        let pool = build_pool(config, 1);
        info!(
            generation = 1,
            nodes = pool.nodes().len(),
            http_nodes = pool.http_nodes().len(),
            "node pool built"
        );
        Self {
            pool: ArcSwap::from_pointee(pool),
            selector,
            next_generation: AtomicU64::new(2),
            reload_lock: Mutex::new(()),
        }
    }

    /// Same as [`NodePoolManager::new`] with the thread-local RNG.
    pub fn with_thread_rng(config: &ClientConfig) -> Self {
        Self::new(config, Arc::new(ThreadRngSelector))
    }

    /// Snapshot of the current pool generation.
    pub fn pool(&self) -> Arc<NodePool> {
        self.pool.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.pool.load().generation()
    }

    /// Pick one eligible node uniformly at random.
    ///
    /// Read-only with respect to health state.
    pub fn get_node(&self) -> PoolResult<Arc<Node>> {
        let pool = self.pool.load();
        let candidates = pool.eligible_nodes();
        choose(self.selector.as_ref(), &candidates)
            .map(|node| Arc::clone(node))
            .ok_or(PoolError::NoAvailableNode)
    }

    /// Pick one HTTP endpoint uniformly at random.
    ///
    /// HTTP endpoints carry no health state: every enabled endpoint of the
    /// current generation stays a candidate until the next reload,
    /// whatever the protocol nodes' danger zones say.
    pub fn get_http_node(&self) -> PoolResult<String> {
        let pool = self.pool.load();
        choose(self.selector.as_ref(), pool.http_nodes())
            .cloned()
            .ok_or(PoolError::NoAvailableNode)
    }

    /// Replace the pool with one built from `config`.
    ///
    /// An absent config is logged and ignored; the current pool stays
    /// authoritative. Returns whether a new generation was installed.
    pub fn reload_config(&self, config: Option<&ClientConfig>) -> bool {
        let Some(config) = config else {
            error!(
                generation = self.generation(),
                "attempt to reload with absent client config, keeping current pool"
            );
            return false;
        };

        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = self.next_generation.fetch_add(1, Ordering::AcqRel);
        info!(generation, "client config reloading");

        let pool = build_pool(config, generation);
        let (nodes, http_nodes) = (pool.nodes().len(), pool.http_nodes().len());
        self.pool.store(Arc::new(pool));

        info!(generation, nodes, http_nodes, "client config reloaded");
        true
    }

    /// Run one aggregation step on every node of the current pool.
    ///
    /// Works on the snapshot loaded at call start; a concurrent reload
    /// takes effect on the next tick.
    pub fn tick(&self) -> TickReport {
        let pool = self.pool.load_full();
        let mut report = TickReport {
            generation: pool.generation(),
            ..TickReport::default()
        };

        for node in pool.nodes() {
            let aggregation = node.health().aggregate();
            report.nodes += 1;
            match aggregation.transition {
                Transition::Entered => {
                    report.entered += 1;
                    warn!(
                        node = %node,
                        failures = aggregation.window.failures,
                        total = aggregation.window.total(),
                        "node entered danger zone on failure ratio"
                    );
                }
                Transition::Cleared => {
                    report.cleared += 1;
                    info!(node = %node, "node left danger zone");
                }
                Transition::Unchanged => {}
            }
        }

        debug!(
            generation = report.generation,
            nodes = report.nodes,
            entered = report.entered,
            cleared = report.cleared,
            "health tick"
        );
        report
    }
}

impl std::fmt::Debug for NodePoolManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodePoolManager")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
