//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Bind the route registry into an Axum Router
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve the generic gateway handler every route points at
//! - Hand resolved routes to the action executor

use async_trait::async_trait;
use axum::{
    extract::{Extension, Request, State},
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::middleware::{AuthPolicy, RouteContext};
use crate::observability::metrics;
use crate::routing::{Action, Binding, BindError, BoundRouter, DispatchBinder, Route, RouteRegistry};

/// Request ID header set on every request and echoed on every response.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Runs a resolved route's actions. The backend-calling engine plugs in here.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, route: &Route, request: Request) -> Response;
}

/// Application state injected into the gateway handler.
#[derive(Clone)]
pub struct GatewayState {
    pub registry: Arc<RouteRegistry>,
    pub executor: Arc<dyn ActionExecutor>,
}

/// A route's actions in the order they are to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchPlan<'a> {
    pub route_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<&'a str>,
    pub method: &'a str,
    pub path: &'a str,
    pub steps: Vec<&'a Action>,
}

impl<'a> DispatchPlan<'a> {
    pub fn for_route(route: &'a Route) -> Self {
        Self {
            route_id: route.id(),
            alias: route.alias(),
            method: route.method(),
            path: route.path(),
            steps: route.execution_order(),
        }
    }
}

/// Executor that answers with the dispatch plan instead of calling backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanExecutor;

#[async_trait]
impl ActionExecutor for PlanExecutor {
    async fn execute(&self, route: &Route, _request: Request) -> Response {
        Json(DispatchPlan::for_route(route)).into_response()
    }
}

/// Generic handler every bound route points at.
/// Resolves the route named by the request's `RouteContext` and executes it.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Extension(context): Extension<RouteContext>,
    request: Request,
) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let route = match state.registry.get_route(context.route_id()) {
        Some(route) => route,
        None => {
            tracing::warn!(request_id = %request_id, route_id = %context.route_id(), "Route not in registry");
            metrics::record_request(context.route_id(), 404, start_time);
            return (StatusCode::NOT_FOUND, "Unknown route").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        route_id = %route.id(),
        method = %route.method(),
        path = %route.path(),
        actions = route.actions().len(),
        "Dispatching request"
    );

    let response = state.executor.execute(route, request).await;
    metrics::record_request(route.id(), response.status().as_u16(), start_time);
    response
}

async fn no_route() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "No matching route found")
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    bindings: Vec<Binding>,
    registry: Arc<RouteRegistry>,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Bind `registry` and answer with dispatch plans.
    pub fn new(config: GatewayConfig, registry: RouteRegistry) -> Result<Self, BindError> {
        Self::with_executor(config, registry, Arc::new(PlanExecutor))
    }

    /// Bind `registry` and run routes through `executor`.
    ///
    /// The registry is moved into shared state here; it cannot change after binding.
    pub fn with_executor(
        config: GatewayConfig,
        registry: RouteRegistry,
        executor: Arc<dyn ActionExecutor>,
    ) -> Result<Self, BindError> {
        let binder = DispatchBinder::new(AuthPolicy::from_config(&config.auth));
        let BoundRouter { router, bindings } = binder.bind(&registry, Router::new())?;
        metrics::record_routes_registered(bindings.len());

        let registry = Arc::new(registry);
        let state = GatewayState {
            registry: registry.clone(),
            executor,
        };
        let router = Self::build_router(&config, router, state);

        Ok(Self {
            router,
            bindings,
            registry,
            config,
        })
    }

    /// Attach state and the server-wide middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, routes: Router<GatewayState>, state: GatewayState) -> Router {
        routes
            .fallback(no_route)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.bindings.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Registrations made while binding, in registry order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// The registry the server dispatches against.
    pub fn registry(&self) -> Arc<RouteRegistry> {
        self.registry.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    fn registry() -> RouteRegistry {
        let mut route = Route::new("r-1", "GET", "/api/orders").with_alias("orders");
        route.add_action(Action::new("/v1/audit", "audit", "POST").with_sequence(2).with_alias("audit"));
        route.add_action(Action::new("/v1/orders", "orders", "GET").with_sequence(1).with_alias("list"));

        let mut registry = RouteRegistry::new();
        registry.add_route(route).unwrap();
        registry
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_plan_is_sorted_by_sequence() {
        let server = GatewayServer::new(GatewayConfig::default(), registry()).unwrap();
        let response = server
            .router()
            .oneshot(axum::http::Request::get("/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(&X_REQUEST_ID));

        let plan = body_json(response).await;
        assert_eq!(plan["route_id"], "r-1");
        assert_eq!(plan["alias"], "orders");
        assert_eq!(plan["steps"][0]["alias"], "list");
        assert_eq!(plan["steps"][1]["alias"], "audit");
    }

    #[tokio::test]
    async fn test_unbound_path_and_method() {
        let server = GatewayServer::new(GatewayConfig::default(), registry()).unwrap();

        let response = server
            .router()
            .oneshot(axum::http::Request::get("/elsewhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = server
            .router()
            .oneshot(axum::http::Request::post("/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_route_missing_from_state_registry() {
        let bound = DispatchBinder::new(AuthPolicy::disabled())
            .bind(&registry(), Router::new())
            .unwrap();
        let router = bound.router.with_state(GatewayState {
            registry: Arc::new(RouteRegistry::new()),
            executor: Arc::new(PlanExecutor),
        });

        let response = router
            .oneshot(axum::http::Request::get("/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Unknown route");
    }

    #[tokio::test]
    async fn test_custom_executor_receives_route() {
        struct EchoId;

        #[async_trait]
        impl ActionExecutor for EchoId {
            async fn execute(&self, route: &Route, _request: Request) -> Response {
                route.id().to_string().into_response()
            }
        }

        let server =
            GatewayServer::with_executor(GatewayConfig::default(), registry(), Arc::new(EchoId)).unwrap();
        let response = server
            .router()
            .oneshot(axum::http::Request::get("/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"r-1");
    }
}
