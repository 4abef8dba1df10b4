//! espool-pool: client-side node pool for a search cluster.
//!
//! Answers two questions for the transport layer: "which node should I
//! use right now" and "is this node currently trustworthy".
//!
//! # Components
//!
//! - **`builder`**: Turns node definitions into pooled nodes and HTTP endpoints
//! - **`pool`**: One immutable pool generation
//! - **`manager`**: Owns the current pool, swaps it on reload, selects nodes
//! - **`selector`**: Injectable random source for uniform picks
//! - **`reload`**: Config change channel the manager subscribes to
//! - **`ticker`**: Periodic health aggregation loop
//! - **`service`**: Startup/shutdown lifecycle around the manager
//!
//! # Flow
//!
//! ```text
//! ConfigPublisher ──► watch_config ──► build_pool ──► ArcSwap<NodePool>
//!                                                        ▲       │
//!                               run_ticker ── tick() ────┘       ▼
//!                                               get_node() / get_http_node()
//! ```

pub mod builder;
pub mod error;
pub mod manager;
pub mod node;
pub mod pool;
pub mod reload;
pub mod selector;
pub mod service;
pub mod ticker;

pub use builder::{build_http_nodes, build_nodes, build_pool, DEFAULT_HTTP_PORT};
pub use error::{PoolError, PoolResult};
pub use manager::{NodePoolManager, TickReport};
pub use node::Node;
pub use pool::NodePool;
pub use reload::{config_channel, ConfigPublisher, ConfigSubscription};
pub use selector::{SeededSelector, Selector, ThreadRngSelector};
pub use service::NodePoolService;

pub use espool_core::{ClientConfig, HealthPolicy, NodeDefinition};
pub use espool_health::{Outcome, Transition};
