//! Node pool service: startup and shutdown around the manager.
//!
//! `start` builds the manager from the initial config and spawns two
//! background tasks: the config reload listener and the health ticker.
//! Callers get a handle to the manager instead of reaching for a global.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use espool_core::{ClientConfig, ConfigResult};

use crate::manager::NodePoolManager;
use crate::reload::ConfigSubscription;
use crate::selector::Selector;

/// A running node pool with its background tasks.
pub struct NodePoolService {
    manager: Arc<NodePoolManager>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl NodePoolService {
    /// Build the manager and spawn its background tasks.
    ///
    /// Must be called from within a Tokio runtime. The tick period is
    /// fixed by the initial config; reloads change the topology only.
    pub fn start(
        config: &ClientConfig,
        subscription: ConfigSubscription,
        selector: Arc<dyn Selector>,
    ) -> ConfigResult<Self> {
        config.validate()?;
        let period = config.tick_interval()?;

        let manager = Arc::new(NodePoolManager::new(config, selector));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let reload_task = {
            let manager = manager.clone();
            let shutdown = shutdown_rx.clone();
            tokio::spawn(async move { manager.watch_config(subscription, shutdown).await })
        };
        let tick_task = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.run_ticker(period, shutdown_rx).await })
        };

        info!(
            period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            "node pool service started"
        );

        Ok(Self {
            manager,
            shutdown_tx,
            tasks: vec![reload_task, tick_task],
        })
    }

    pub fn manager(&self) -> Arc<NodePoolManager> {
        self.manager.clone()
    }

    /// Signal both tasks and wait for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "node pool task ended abnormally");
            }
        }
        info!("node pool service stopped");
    }
}
