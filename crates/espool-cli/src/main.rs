use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "espool",
    about = "espool: search cluster node pool",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a client config and show the pool it builds
    Check {
        /// Path to the client config (TOML)
        #[arg(short, long, default_value = "espool.toml")]
        config: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Run the pool against a config file, reloading it on change.
    ///
    /// Picks a node and an HTTP endpoint on every pick interval and logs
    /// them. Stops on Ctrl-C.
    Run {
        /// Path to the client config (TOML)
        #[arg(short, long, default_value = "espool.toml")]
        config: String,
        /// Seconds between config file modification checks
        #[arg(long, default_value = "2")]
        poll_secs: u64,
        /// Milliseconds between node picks
        #[arg(long, default_value = "1000")]
        pick_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,espool=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config, format } => commands::check::check(&config, &format),
        Commands::Run {
            config,
            poll_secs,
            pick_ms,
        } => commands::run::run(&config, poll_secs, pick_ms).await,
    }
}
