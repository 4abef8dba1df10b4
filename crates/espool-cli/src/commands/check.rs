use std::path::Path;

use serde::Serialize;

use espool_core::ClientConfig;
use espool_pool::build_pool;

#[derive(Debug, Serialize)]
struct PoolReport {
    tick_interval_ms: u64,
    nodes: Vec<NodeReport>,
    http_nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NodeReport {
    host: String,
    port: i32,
    enabled: bool,
    eligible: bool,
}

pub fn check(path: &str, format: &str) -> anyhow::Result<()> {
    let config = ClientConfig::from_file(Path::new(path))?;
    let report = pool_report(&config)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", format_report(&report)),
    }

    Ok(())
}

fn pool_report(config: &ClientConfig) -> anyhow::Result<PoolReport> {
    let pool = build_pool(config, 1);
    Ok(PoolReport {
        tick_interval_ms: u64::try_from(config.tick_interval()?.as_millis())
            .unwrap_or(u64::MAX),
        nodes: pool
            .nodes()
            .iter()
            .map(|n| NodeReport {
                host: n.host().to_string(),
                port: n.port(),
                enabled: n.enabled(),
                eligible: n.is_eligible(),
            })
            .collect(),
        http_nodes: pool.http_nodes().to_vec(),
    })
}

fn format_report(report: &PoolReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("tick interval: {}ms\n", report.tick_interval_ms));

    out.push_str(&format!("nodes ({}):\n", report.nodes.len()));
    for n in &report.nodes {
        let state = if n.eligible { "eligible" } else { "disabled" };
        out.push_str(&format!("  {}:{}  {state}\n", n.host, n.port));
    }

    out.push_str(&format!("http nodes ({}):\n", report.http_nodes.len()));
    for h in &report.http_nodes {
        out.push_str(&format!("  {h}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
tick_interval = "500ms"

[[nodes]]
host = "10.0.0.1"
port = 9500

[[nodes]]
host = "10.0.0.2"
port = 9500
enabled = false

[[http_nodes]]
host = "10.0.0.1"

[[http_nodes]]
host = "10.0.0.2"
port = 9200
enabled = false
"#;

    #[test]
    fn report_reflects_config() {
        let config = ClientConfig::from_toml_str(CONFIG).unwrap();
        let report = pool_report(&config).unwrap();

        assert_eq!(report.tick_interval_ms, 500);
        assert_eq!(report.nodes.len(), 2);
        assert!(report.nodes[0].eligible);
        assert!(!report.nodes[1].enabled);
        assert_eq!(report.http_nodes, vec!["http://10.0.0.1:80"]);
    }

    #[test]
    fn text_report_lists_nodes() {
        let config = ClientConfig::from_toml_str(CONFIG).unwrap();
        let text = format_report(&pool_report(&config).unwrap());

        assert!(text.contains("nodes (2):"));
        assert!(text.contains("10.0.0.1:9500  eligible"));
        assert!(text.contains("10.0.0.2:9500  disabled"));
        assert!(text.contains("http://10.0.0.1:80"));
    }

    #[test]
    fn check_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("espool.toml");
        std::fs::write(&path, CONFIG).unwrap();

        check(path.to_str().unwrap(), "json").unwrap();
        assert!(check(dir.path().join("missing.toml").to_str().unwrap(), "text").is_err());
    }
}
