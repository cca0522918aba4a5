//! RPC server binary.
//!
//! Thin wrapper over [`rpc_server::LifecycleController`]: parse flags, set up
//! tracing and the optional metrics exporter, start the server, wait for
//! ctrl-c, stop it.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rpc_server::config;
use rpc_server::observability::metrics;
use rpc_server::LifecycleController;

#[derive(Parser)]
#[command(name = "rpc-server")]
#[command(about = "Bootstrap controller for the RPC server", long_about = None)]
struct Cli {
    /// TOML override file; built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rpc_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rpc-server starting");

    // The exporter is process-wide and decided once; the controller re-reads
    // the config file on every start call.
    let settings = config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Error loading config, continuing with defaults");
        config::builtin()
    });
    if settings.get_or("metrics.enabled", "false") == "true" {
        let raw_addr = settings.get_or("metrics.address", "127.0.0.1:9100");
        match raw_addr.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(metrics_address = %raw_addr, "Failed to parse metrics address"),
        }
    }

    let controller = LifecycleController::new();
    if let Err(e) = controller.start(cli.config.as_deref()).await {
        tracing::error!(error = %e, "Bootstrap failed");
        return Err(e.into());
    }
    if let Some(addr) = controller.local_addr().await {
        tracing::info!(address = %addr, "Serving RPC requests");
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    controller.stop().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
