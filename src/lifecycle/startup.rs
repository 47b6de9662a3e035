//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route registry from config or from the persisted snapshot
//! - Bind the registry and start the gateway listener
//! - Start optional side listeners (admin API, metrics)
//!
//! # Design Decisions
//! - Fail fast: compile and bind errors are fatal
//! - A missing or unreadable snapshot is not fatal; it yields no routes
//! - Listeners start last (traffic only when the registry is bound)

use std::io;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::admin::{setup_admin_router, AdminState};
use crate::config::{GatewayConfig, RouteSource};
use crate::http::GatewayServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;
use crate::routing::persistence::report_diagnostics;
use crate::routing::{BindError, CompileError, IdGenerator, RouteRegistry, UuidV4Generator};
use crate::storage::{BlobStore, FsBlobStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("route binding failed: {0}")]
    Bind(#[from] BindError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Build the registry according to `storage.source`.
pub fn build_registry(
    config: &GatewayConfig,
    store: &dyn BlobStore,
    ids: &dyn IdGenerator,
) -> Result<RouteRegistry, StartupError> {
    let from_config = match config.storage.source {
        RouteSource::Config => true,
        RouteSource::Snapshot => false,
        RouteSource::Auto => !config.gateway.routes.is_empty(),
    };

    if !from_config {
        let outcome = RouteRegistry::init_from_file(store, Some(config.storage.routes_file.as_str()));
        report_diagnostics(&outcome);
        return Ok(outcome.registry);
    }

    let registry = RouteRegistry::from_config(&config.gateway, ids)?;
    tracing::info!(
        routes = registry.len(),
        prefix = %config.gateway.prefix(),
        "Routes compiled from configuration"
    );

    if config.storage.save_snapshot {
        if let Err(e) = registry.save_to_file(store, Some(config.storage.routes_file.as_str())) {
            tracing::warn!(error = %e, "Failed to save route snapshot");
        }
    }

    Ok(registry)
}

/// Run the gateway until `shutdown` fires.
pub async fn run(config: GatewayConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    let store = FsBlobStore::new(&config.storage.root);
    let registry = build_registry(&config, &store, &UuidV4Generator)?;
    if registry.is_empty() {
        tracing::warn!("No routes registered; every request will be answered with 404");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = GatewayServer::new(config.clone(), registry)?;

    if config.admin.enabled {
        let admin_listener = TcpListener::bind(&config.admin.bind_address).await?;
        let router = setup_admin_router(AdminState::new(server.registry(), &config.admin.api_key));
        let admin_shutdown = shutdown.notified();
        tracing::info!(address = %admin_listener.local_addr()?, "Admin API listening");
        tokio::spawn(async move {
            let served = axum::serve(admin_listener, router)
                .with_graceful_shutdown(admin_shutdown)
                .await;
            if let Err(e) = served {
                tracing::error!(error = %e, "Admin API stopped");
            }
        });
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    server.run(listener, shutdown.notified()).await?;
    Ok(())
}
