//! Read-only admin API over the route registry.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::routing::RouteRegistry;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub registry: Arc<RouteRegistry>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(registry: Arc<RouteRegistry>, api_key: &str) -> Self {
        Self {
            registry,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(get_routes))
        .route("/admin/routes/{id}", get(get_route))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
