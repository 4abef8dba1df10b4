//! espool-core: shared types for the espool node pool.
//!
//! Holds the raw node definitions handed over by the configuration
//! source, the `ClientConfig` snapshot they arrive in, and the
//! `HealthPolicy` that drives danger-zone decisions.

pub mod config;
pub mod error;
pub mod types;

pub use config::{parse_duration, ClientConfig, HealthPolicy};
pub use error::{ConfigError, ConfigResult};
pub use types::NodeDefinition;
