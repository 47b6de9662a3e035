//! Projection of the registry into the HTTP router.
//!
//! # Responsibilities
//! - Register every route's `(method, path)` with the axum router
//! - Point each registration at the single generic gateway handler
//! - Attach the middleware chain `[auth, route context]` per route
//!
//! # Design Decisions
//! - One-shot: the registry is bound once at startup, then moved into
//!   shared state where nothing can add to it
//! - Paths are checked against the same matcher axum uses, so conflicts and
//!   malformed paths come back as `BindError` instead of a panic in `Router::route`
//! - Methods are matched case-insensitively (`get` binds as `GET`)

use axum::http::Method;
use axum::middleware;
use axum::routing::{on, MethodFilter};
use axum::Router;
use std::collections::HashMap;

use crate::http::middleware::{inject_route_context, require_auth, AuthPolicy, RouteContext};
use crate::http::server::{gateway_handler, GatewayState};
use crate::routing::error::BindError;
use crate::routing::registry::RouteRegistry;

/// Method filter for a route method, if axum can dispatch it.
pub fn method_filter(method: &str) -> Option<MethodFilter> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).ok()?;
    MethodFilter::try_from(method).ok()
}

/// One registration made against the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub method: String,
    pub path: String,
    pub route_id: String,
    pub requires_auth: bool,
}

/// The router with every route registered, and what was registered.
pub struct BoundRouter {
    pub router: Router<GatewayState>,
    pub bindings: Vec<Binding>,
}

/// Wires routes into an axum router.
#[derive(Debug, Clone)]
pub struct DispatchBinder {
    auth: AuthPolicy,
}

impl DispatchBinder {
    pub fn new(auth: AuthPolicy) -> Self {
        Self { auth }
    }

    /// Register every route held by `registry` on `router`, in registry order.
    pub fn bind(
        &self,
        registry: &RouteRegistry,
        mut router: Router<GatewayState>,
    ) -> Result<BoundRouter, BindError> {
        let mut bindings = Vec::with_capacity(registry.len());
        let mut seen: HashMap<(String, String), String> = HashMap::new();
        let mut paths = PathCheck::default();

        for route in registry.routes() {
            let filter = method_filter(route.method()).ok_or_else(|| BindError::UnsupportedMethod {
                route_id: route.id().to_string(),
                method: route.method().to_string(),
            })?;

            if !is_bindable_path(route.path()) {
                return Err(BindError::InvalidPath {
                    route_id: route.id().to_string(),
                    path: route.path().to_string(),
                });
            }

            let method = route.method().to_ascii_uppercase();
            let key = (method.clone(), route.path().to_string());
            if let Some(existing) = seen.get(&key) {
                return Err(BindError::Conflict {
                    method,
                    path: route.path().to_string(),
                    existing: existing.clone(),
                    route_id: route.id().to_string(),
                });
            }
            paths.insert(&method, route.id(), route.path())?;
            seen.insert(key, route.id().to_string());

            let context = RouteContext::new(route.id());
            let endpoint = on(filter, gateway_handler)
                .layer(middleware::from_fn_with_state(context, inject_route_context))
                .layer(middleware::from_fn_with_state(self.auth.clone(), require_auth));
            router = router.route(route.path(), endpoint);

            tracing::debug!(
                route_id = %route.id(),
                method = %method,
                path = %route.path(),
                auth = self.auth.is_enabled(),
                "Route bound"
            );
            bindings.push(Binding {
                method,
                path: route.path().to_string(),
                route_id: route.id().to_string(),
                requires_auth: self.auth.is_enabled(),
            });
        }

        tracing::info!(routes = bindings.len(), "Registry bound to router");
        Ok(BoundRouter { router, bindings })
    }
}

/// Axum rejects paths without a leading `/` and legacy `:param` / `*rest` segments.
fn is_bindable_path(path: &str) -> bool {
    path.starts_with('/')
        && path
            .split('/')
            .all(|segment| !segment.starts_with(':') && !segment.starts_with('*'))
}

/// Mirror of the path table axum builds, used to fail before `Router::route` does.
///
/// Routes sharing a path are merged into one entry, as axum merges their
/// method routers.
#[derive(Default)]
struct PathCheck {
    matcher: matchit::Router<()>,
    owners: HashMap<String, String>,
}

impl PathCheck {
    fn insert(&mut self, method: &str, route_id: &str, path: &str) -> Result<(), BindError> {
        if self.owners.contains_key(path) {
            return Ok(());
        }

        match self.matcher.insert(path, ()) {
            Ok(()) => {
                self.owners.insert(path.to_string(), route_id.to_string());
                Ok(())
            }
            Err(matchit::InsertError::Conflict { with }) => Err(BindError::Conflict {
                method: method.to_string(),
                path: path.to_string(),
                existing: self.owners.get(&with).cloned().unwrap_or(with),
                route_id: route_id.to_string(),
            }),
            Err(e) => {
                tracing::debug!(route_id = %route_id, path = %path, error = %e, "Path rejected");
                Err(BindError::InvalidPath {
                    route_id: route_id.to_string(),
                    path: path.to_string(),
                })
            }
        }
    }
}
