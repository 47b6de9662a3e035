//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

use api_gateway::{GatewayConfig, GatewayServer, RouteRegistry, Shutdown};

pub const API_KEY: &str = "integration-key";

/// Gateway config with `routes_toml` appended and API key auth enabled.
pub fn config_with(routes_toml: &str) -> GatewayConfig {
    let text = format!(
        "[auth]\nenabled = true\napi_keys = [\"{}\"]\n{}",
        API_KEY, routes_toml
    );
    api_gateway::config::parse_config(&text).unwrap()
}

/// Bind `registry`, serve it on an ephemeral port and return the address.
#[allow(dead_code)]
pub async fn start_gateway(
    config: GatewayConfig,
    registry: RouteRegistry,
    shutdown: &Shutdown,
) -> SocketAddr {
    let server = GatewayServer::new(config, registry).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.notified();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

/// HTTP client without connection pooling or proxies.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
