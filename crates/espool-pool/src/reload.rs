//! Config change channel.
//!
//! The configuration source pushes complete snapshots through a
//! `ConfigPublisher`; the manager subscribes at startup and rebuilds its
//! pool on every notification. Publishing `None` models an absent or
//! unreadable snapshot, which the manager logs and ignores.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use espool_core::ClientConfig;

use crate::manager::NodePoolManager;

type Snapshot = Option<Arc<ClientConfig>>;

/// Sending half, held by the configuration source.
#[derive(Debug, Clone)]
pub struct ConfigPublisher {
    tx: watch::Sender<Snapshot>,
}

/// Receiving half, handed to the manager.
#[derive(Debug, Clone)]
pub struct ConfigSubscription {
    rx: watch::Receiver<Snapshot>,
}

/// Create a channel whose current value is `initial`.
///
/// The initial snapshot counts as already seen: subscribers react only
/// to later publishes.
pub fn config_channel(initial: ClientConfig) -> (ConfigPublisher, ConfigSubscription) {
    let (tx, rx) = watch::channel(Some(Arc::new(initial)));
    (ConfigPublisher { tx }, ConfigSubscription { rx })
}

impl ConfigPublisher {
    /// Push a new snapshot. Always replaces the stored value, even when
    /// no subscriber is listening.
    pub fn publish(&self, config: Option<ClientConfig>) {
        self.tx.send_replace(config.map(Arc::new));
    }
}

impl ConfigSubscription {
    /// Latest published snapshot.
    pub fn current(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next publish. `None` once the publisher is gone.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl NodePoolManager {
    /// Apply every published snapshot until shutdown or until the
    /// publisher is dropped.
    ///
    /// Bursts of publishes coalesce: only the latest snapshot is applied.
    pub async fn watch_config(
        &self,
        mut subscription: ConfigSubscription,
        mut shutdown: watch::Receiver<bool>,
    ) {
        debug!("config reload listener started");

        loop {
            tokio::select! {
                snapshot = subscription.next() => {
                    let Some(snapshot) = snapshot else {
                        info!("config publisher closed, reload listener exiting");
                        break;
                    };
                    self.reload_config(snapshot.as_deref());
                }
                _ = shutdown.changed() => {
                    debug!("config reload listener shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use espool_core::NodeDefinition;

    use super::*;

    fn config_with(host: &str) -> ClientConfig {
        ClientConfig::default().with_nodes(vec![NodeDefinition::new(host, 9500, true)])
    }

    async fn wait_for_generation(manager: &NodePoolManager, generation: u64) {
        for _ in 0..100 {
            if manager.generation() >= generation {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("generation {generation} never installed");
    }

    #[tokio::test]
    async fn subscription_sees_latest_publish() {
        let (publisher, mut subscription) = config_channel(config_with("a"));
        assert_eq!(subscription.current().unwrap().nodes[0].host, "a");

        publisher.publish(Some(config_with("b")));
        let snapshot = subscription.next().await.unwrap().unwrap();
        assert_eq!(snapshot.nodes[0].host, "b");

        publisher.publish(None);
        assert!(subscription.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn next_ends_when_publisher_dropped() {
        let (publisher, mut subscription) = config_channel(config_with("a"));
        drop(publisher);
        assert!(subscription.next().await.is_none());
    }

    #[tokio::test]
    async fn watch_config_reloads_on_publish() {
        let initial = config_with("a");
        let (publisher, subscription) = config_channel(initial.clone());
        let manager = Arc::new(NodePoolManager::with_thread_rng(&initial));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let listener = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.watch_config(subscription, shutdown_rx).await })
        };

        publisher.publish(Some(config_with("b")));
        wait_for_generation(&manager, 2).await;
        assert_eq!(manager.get_node().unwrap().host(), "b");

        // An absent snapshot leaves the pool alone.
        publisher.publish(None);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(manager.generation(), 2);
        assert_eq!(manager.get_node().unwrap().host(), "b");

        let _ = shutdown_tx.send(true);
        listener.await.unwrap();
    }

    #[tokio::test]
    async fn watch_config_exits_when_publisher_dropped() {
        let initial = config_with("a");
        let (publisher, subscription) = config_channel(initial.clone());
        let manager = NodePoolManager::with_thread_rng(&initial);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        drop(publisher);
        tokio::time::timeout(
            Duration::from_secs(1),
            manager.watch_config(subscription, shutdown_rx),
        )
        .await
        .unwrap();
        assert_eq!(manager.generation(), 1);
    }
}
