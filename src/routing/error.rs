//! Routing error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Registry invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("route id `{0}` is already registered")]
    DuplicateRouteId(String),
}

/// Failures compiling the `gateway` config section into routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{}: missing required field `{field}`", location(.route, .action))]
    MissingField {
        route: String,
        action: Option<String>,
        field: &'static str,
    },

    #[error("route `{route}`: unsupported HTTP method `{method}`")]
    UnsupportedMethod { route: String, method: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn location(route: &str, action: &Option<String>) -> String {
    match action {
        Some(action) => format!("route `{}` action `{}`", route, action),
        None => format!("route `{}`", route),
    }
}

/// Failures reading or writing route snapshots.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("malformed route snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("snapshot record {index} skipped: {source}")]
    Skipped {
        index: usize,
        #[source]
        source: RegistryError,
    },
}

/// Failures projecting the registry into the HTTP router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("route `{route_id}`: unsupported HTTP method `{method}`")]
    UnsupportedMethod { route_id: String, method: String },

    #[error("route `{route_id}`: path `{path}` cannot be registered")]
    InvalidPath { route_id: String, path: String },

    #[error("routes `{existing}` and `{route_id}` both bind {method} {path}")]
    Conflict {
        method: String,
        path: String,
        existing: String,
        route_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_messages() {
        let err = CompileError::MissingField {
            route: "users".into(),
            action: Some("lookup".into()),
            field: "service",
        };
        assert_eq!(
            err.to_string(),
            "route `users` action `lookup`: missing required field `service`"
        );

        let err = CompileError::MissingField {
            route: "users".into(),
            action: None,
            field: "path",
        };
        assert_eq!(err.to_string(), "route `users`: missing required field `path`");
    }
}
