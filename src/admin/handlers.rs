use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::admin::AdminState;
use crate::routing::Route;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub routes: usize,
}

#[derive(Serialize)]
pub struct RouteSummary {
    pub id: String,
    pub alias: Option<String>,
    pub method: String,
    pub path: String,
    pub actions: usize,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id().to_string(),
            alias: route.alias().map(str::to_string),
            method: route.method().to_string(),
            path: route.path().to_string(),
            actions: route.actions().len(),
        }
    }
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        routes: state.registry.len(),
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RouteSummary>> {
    Json(state.registry.routes().iter().map(RouteSummary::from).collect())
}

pub async fn get_route(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Result<Json<Route>, StatusCode> {
    state
        .registry
        .get_route(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
