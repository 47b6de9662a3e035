//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::declared::Declared;

/// Path prefix applied when `gateway.global.prefix` is not configured.
pub const DEFAULT_PREFIX: &str = "/";

/// Snapshot key used when no other name is configured.
pub const DEFAULT_ROUTES_FILE: &str = "routes.json";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Authentication required on every bound route.
    pub auth: AuthConfig,

    /// Blob store and snapshot settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Declarative route definitions.
    pub gateway: GatewaySection,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Authentication configuration for gateway routes.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Enforce API keys. When disabled every request passes through.
    pub enabled: bool,

    /// Accepted keys, sent as `Authorization: Bearer <key>` or `X-Api-Key`.
    pub api_keys: Vec<String>,
}

/// Where the route registry comes from at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    /// Compile `gateway.routes`.
    Config,
    /// Load the persisted snapshot.
    Snapshot,
    /// Config when it declares routes, snapshot otherwise.
    #[default]
    Auto,
}

/// Blob store and snapshot configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory backing the blob store.
    pub root: String,

    /// Snapshot key inside the store.
    pub routes_file: String,

    /// Route source policy.
    pub source: RouteSource,

    /// Write a snapshot after compiling routes from config.
    pub save_snapshot: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: "./storage".to_string(),
            routes_file: DEFAULT_ROUTES_FILE.to_string(),
            source: RouteSource::Auto,
            save_snapshot: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// The `gateway` section: global settings plus declared routes.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewaySection {
    pub global: GlobalConfig,

    /// Routes keyed by alias, in declaration order.
    pub routes: Declared<RouteEntry>,
}

impl GatewaySection {
    /// The configured prefix, or `/` when unset.
    pub fn prefix(&self) -> &str {
        self.global.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Prepended verbatim to every route path.
    pub prefix: Option<String>,
}

/// A declared route. Required fields are checked when routes are compiled.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct RouteEntry {
    pub method: Option<String>,
    pub path: Option<String>,

    /// Actions keyed by alias, in declaration order.
    #[serde(default)]
    pub actions: Declared<ActionEntry>,
}

/// A declared backend action.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ActionEntry {
    pub service: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,

    #[serde(default)]
    pub sequence: u32,

    #[serde(default)]
    pub critical: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.routes_file, "routes.json");
        assert_eq!(config.storage.source, RouteSource::Auto);
        assert!(config.gateway.routes.is_empty());
        assert_eq!(config.gateway.prefix(), "/");
    }

    #[test]
    fn test_route_tables() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [gateway.global]
            prefix = "/api"

            [gateway.routes.users]
            method = "GET"
            path = "/users"

            [gateway.routes.users.actions.lookup]
            service = "user-svc"
            path = "/v1/users"
            method = "GET"

            [gateway.routes.users.actions.audit]
            service = "audit-svc"
            path = "/v1/audit"
            method = "POST"
            sequence = 1
            critical = true
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.prefix(), "/api");
        let users = config.gateway.routes.get("users").unwrap();
        assert_eq!(users.method.as_deref(), Some("GET"));

        let actions: Vec<_> = users.actions.iter().collect();
        assert_eq!(actions[0].0, "lookup");
        assert_eq!(actions[0].1.sequence, 0);
        assert!(!actions[0].1.critical);
        assert_eq!(actions[1].0, "audit");
        assert_eq!(actions[1].1.sequence, 1);
        assert!(actions[1].1.critical);
    }

    #[test]
    fn test_source_names() {
        let config: GatewayConfig = toml::from_str("[storage]\nsource = \"snapshot\"").unwrap();
        assert_eq!(config.storage.source, RouteSource::Snapshot);
    }
}
