//! Periodic health aggregation loop.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::manager::NodePoolManager;

impl NodePoolManager {
    /// Call [`NodePoolManager::tick`] every `period` until shutdown.
    pub async fn run_ticker(&self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(
            period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            "health ticker started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(period) => {
                    let report = self.tick();
                    if report.entered > 0 || report.cleared > 0 {
                        info!(
                            generation = report.generation,
                            entered = report.entered,
                            cleared = report.cleared,
                            "danger zone changes"
                        );
                    }
                }
                _ = shutdown.changed() => {
                    debug!("health ticker shutting down");
                    break;
                }
            }
        }
    }
}
