use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{info, warn};

use espool_core::ClientConfig;
use espool_pool::{config_channel, ConfigPublisher, NodePoolService, ThreadRngSelector};

pub async fn run(path: &str, poll_secs: u64, pick_ms: u64) -> anyhow::Result<()> {
    let path = PathBuf::from(path);
    let config = ClientConfig::from_file(&path)?;
    info!(path = %path.display(), nodes = config.nodes.len(), "client config loaded");

    let (publisher, subscription) = config_channel(config.clone());
    let service = NodePoolService::start(&config, subscription, Arc::new(ThreadRngSelector))?;
    let manager = service.manager();

    let mut last_modified = modified_at(&path);
    let mut poll = tokio::time::interval(Duration::from_secs(poll_secs.max(1)));
    let mut pick = tokio::time::interval(Duration::from_millis(pick_ms.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = poll.tick() => {
                let modified = modified_at(&path);
                if modified != last_modified {
                    last_modified = modified;
                    publish_from_file(&publisher, &path);
                }
            }
            _ = pick.tick() => {
                match manager.get_node() {
                    Ok(node) => info!(node = %node, generation = node.generation(), "picked node"),
                    Err(e) => warn!(error = %e, "node pick failed"),
                }
                match manager.get_http_node() {
                    Ok(endpoint) => info!(%endpoint, "picked http node"),
                    Err(e) => warn!(error = %e, "http node pick failed"),
                }
            }
            _ = &mut ctrl_c => {
                info!("interrupt received, stopping");
                break;
            }
        }
    }

    service.shutdown().await;
    Ok(())
}

/// Re-read the config and publish it. A file that no longer parses is
/// published as an absent snapshot, which keeps the current pool.
fn publish_from_file(publisher: &ConfigPublisher, path: &Path) {
    match ClientConfig::from_file(path) {
        Ok(config) => {
            info!(path = %path.display(), "client config changed");
            publisher.publish(Some(config));
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "client config unreadable");
            publisher.publish(None);
        }
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishes_parsed_or_absent_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("espool.toml");
        std::fs::write(&path, "[[nodes]]\nhost = \"a\"\n").unwrap();

        let (publisher, subscription) = config_channel(ClientConfig::default());

        publish_from_file(&publisher, &path);
        let snapshot = subscription.current().unwrap();
        assert_eq!(snapshot.nodes[0].host, "a");

        std::fs::write(&path, "[[nodes]\n").unwrap();
        publish_from_file(&publisher, &path);
        assert!(subscription.current().is_none());
    }

    #[test]
    fn overflowing_tick_interval_publishes_absent_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("espool.toml");
        std::fs::write(&path, "tick_interval = \"999999999999999999m\"\n").unwrap();

        let (publisher, subscription) = config_channel(ClientConfig::default());
        publish_from_file(&publisher, &path);
        assert!(subscription.current().is_none());
    }

    #[test]
    fn modified_at_missing_file_is_none() {
        assert!(modified_at(Path::new("/nonexistent/espool.toml")).is_none());
    }
}
