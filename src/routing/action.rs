//! A single backend call step of a route.

use serde::{Deserialize, Serialize};

/// One backend call belonging to a [`Route`](crate::routing::Route).
///
/// Immutable once built. `sequence` defaults to `0` and `critical` to
/// `false`; a critical action's failure aborts the rest of the route's
/// sequence (enforced by the executor, carried here as data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    url: String,
    service: String,
    method: String,
    #[serde(default)]
    sequence: u32,
    #[serde(default)]
    alias: String,
    #[serde(default)]
    critical: bool,
}

impl Action {
    pub fn new(
        url: impl Into<String>,
        service: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            service: service.into(),
            method: method.into(),
            sequence: 0,
            alias: String::new(),
            critical: false,
        }
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Backend endpoint to invoke.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Logical backend service name.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// HTTP verb used against the backend.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }
}
