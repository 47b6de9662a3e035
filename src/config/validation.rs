//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that enabled features carry the settings they need
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Route shape (required fields, methods) is checked by the route compiler,
//!   which owns the typed `CompileError`

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::storage::is_plain_key;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("gateway.global.prefix must start with `/`, got `{0}`")]
    InvalidPrefix(String),

    #[error("auth is enabled but no non-empty api_keys are configured")]
    MissingApiKeys,

    #[error("admin is enabled but admin.api_key is empty")]
    MissingAdminKey,

    #[error("storage.routes_file must be a plain file name, got `{0}`")]
    InvalidSnapshotKey(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if let Some(prefix) = &config.gateway.global.prefix {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix(prefix.clone()));
        }
    }

    if config.auth.enabled && !config.auth.api_keys.iter().any(|k| !k.is_empty()) {
        errors.push(ValidationError::MissingApiKeys);
    }

    if config.admin.enabled {
        if config.admin.api_key.is_empty() {
            errors.push(ValidationError::MissingAdminKey);
        }
        check_address(&mut errors, "admin.bind_address", &config.admin.bind_address);
    }

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if !is_plain_key(&config.storage.routes_file) {
        errors.push(ValidationError::InvalidSnapshotKey(
            config.storage.routes_file.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
