//! API gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                      GATEWAY                         │
//!                 │                                                      │
//!  gateway.toml ──┼─▶ config ──▶ routing::registry ──┐                   │
//!                 │                                  ├─▶ routing::binder │
//!  routes.json ───┼─▶ storage ─▶ routing::persistence┘         │         │
//!                 │                                            ▼         │
//!  Client ────────┼─▶ http::server ─▶ auth ─▶ route context ─▶ handler ──┼─▶ executor
//!                 │                                                      │
//!                 │  observability (tracing, metrics)   lifecycle         │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use api_gateway::config::load_config;
use api_gateway::lifecycle::{self, signals, Shutdown};
use api_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "API gateway serving declaratively configured routes", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        declared_routes = config.gateway.routes.len(),
        "api-gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let shutdown = Shutdown::new();
    signals::trigger_on_signal(shutdown.clone());

    lifecycle::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
