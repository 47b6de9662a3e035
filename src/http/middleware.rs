//! Per-route middleware attached by the binder.
//!
//! Every bound route runs `require_auth` first, then `inject_route_context`,
//! then the gateway handler.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header carrying an API key as an alternative to a bearer token.
pub const X_API_KEY: &str = "x-api-key";

/// Identity of the route a request was dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    route_id: Arc<str>,
}

impl RouteContext {
    pub fn new(route_id: &str) -> Self {
        Self {
            route_id: Arc::from(route_id),
        }
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }
}

/// Insert the route's `RouteContext` into request extensions.
pub async fn inject_route_context(
    State(context): State<RouteContext>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(context);
    next.run(request).await
}

/// API key requirement for gateway routes.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    keys: Option<Arc<[String]>>,
}

impl AuthPolicy {
    /// Require one of `keys`. Empty keys never match.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keys: Some(keys.into()),
        }
    }

    /// Let every request through.
    pub fn disabled() -> Self {
        Self { keys: None }
    }

    pub fn from_config(config: &crate::config::AuthConfig) -> Self {
        if config.enabled {
            Self::new(config.api_keys.iter().cloned())
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.keys.is_some()
    }

    fn accepts(&self, presented: Option<&str>) -> bool {
        match (&self.keys, presented) {
            (None, _) => true,
            (Some(keys), Some(key)) => keys.iter().any(|k| k == key),
            (Some(_), None) => false,
        }
    }
}

fn presented_key(request: &Request) -> Option<&str> {
    let headers = request.headers();
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .or_else(|| headers.get(X_API_KEY).and_then(|h| h.to_str().ok()))
}

/// Reject requests that do not present an accepted key.
pub async fn require_auth(
    State(policy): State<AuthPolicy>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if policy.accepts(presented_key(&request)) {
        return Ok(next.run(request).await);
    }

    tracing::warn!(path = %request.uri().path(), "Rejected unauthenticated request");
    Err(StatusCode::UNAUTHORIZED)
}
