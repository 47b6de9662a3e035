//! Route snapshot persistence.
//!
//! Snapshots are JSON arrays of routes in the same shape `Route`
//! serializes to, so saving and reloading is lossless. Older single-action
//! records (`{id, method, path, service_url, service}`) are still read.
//!
//! Loading never fails: a missing snapshot, an unreadable one, or one that
//! does not decode all yield an empty registry. Problems are handed back as
//! diagnostics for the caller to log.

use serde::Deserialize;
use serde_json::Value;

use crate::config::schema::DEFAULT_ROUTES_FILE;
use crate::observability::metrics;
use crate::routing::action::Action;
use crate::routing::error::PersistenceError;
use crate::routing::registry::RouteRegistry;
use crate::routing::route::Route;
use crate::storage::BlobStore;

/// Result of loading a snapshot: the registry plus anything worth reporting.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub registry: RouteRegistry,
    pub diagnostics: Vec<PersistenceError>,
}

impl LoadOutcome {
    fn empty_with(error: PersistenceError) -> Self {
        Self {
            registry: RouteRegistry::new(),
            diagnostics: vec![error],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct LegacyRecord {
    id: String,
    method: String,
    path: String,
    service_url: String,
    service: String,
}

impl From<LegacyRecord> for Route {
    fn from(record: LegacyRecord) -> Self {
        let action = Action::new(record.service_url, record.service, record.method.clone());
        let mut route = Route::new(record.id, record.method, record.path);
        route.add_action(action);
        route
    }
}

/// Decode one snapshot record, canonical shape first.
///
/// When neither shape fits, the canonical error is returned so the
/// offending field is named.
fn decode_record(value: &Value) -> Result<Route, serde_json::Error> {
    match Route::deserialize(value) {
        Ok(route) => Ok(route),
        Err(canonical) => LegacyRecord::deserialize(value)
            .map(Route::from)
            .map_err(|_| canonical),
    }
}

impl RouteRegistry {
    /// Rebuild a registry from the snapshot stored under `name` (default `routes.json`).
    ///
    /// Persisted identifiers are kept verbatim. A record whose id repeats an
    /// earlier one is skipped and reported.
    pub fn init_from_file(store: &dyn BlobStore, name: Option<&str>) -> LoadOutcome {
        let name = name.unwrap_or(DEFAULT_ROUTES_FILE);

        if !store.exists(name) {
            tracing::debug!(key = %name, "No route snapshot found");
            return LoadOutcome::default();
        }

        let bytes = match store.get(name) {
            Ok(bytes) => bytes,
            Err(e) => return LoadOutcome::empty_with(e.into()),
        };

        let routes = match serde_json::from_slice::<Vec<Value>>(&bytes)
            .and_then(|records| records.iter().map(decode_record).collect::<Result<Vec<_>, _>>())
        {
            Ok(routes) => routes,
            Err(e) => return LoadOutcome::empty_with(e.into()),
        };

        let mut outcome = LoadOutcome::default();
        for (index, route) in routes.into_iter().enumerate() {
            if let Err(source) = outcome.registry.add_route(route) {
                outcome.diagnostics.push(PersistenceError::Skipped { index, source });
            }
        }

        tracing::info!(
            key = %name,
            routes = outcome.registry.len(),
            skipped = outcome.diagnostics.len(),
            "Route snapshot loaded"
        );
        outcome
    }

    /// Write the registry under `name` (default `routes.json`) in the snapshot format.
    pub fn save_to_file(
        &self,
        store: &dyn BlobStore,
        name: Option<&str>,
    ) -> Result<(), PersistenceError> {
        let name = name.unwrap_or(DEFAULT_ROUTES_FILE);
        let bytes = serde_json::to_vec_pretty(self)?;
        store.put(name, &bytes)?;
        tracing::info!(key = %name, routes = self.len(), "Route snapshot saved");
        Ok(())
    }
}

/// Log every diagnostic of a load and count them.
pub fn report_diagnostics(outcome: &LoadOutcome) {
    for diagnostic in &outcome.diagnostics {
        tracing::warn!(error = %diagnostic, "Route snapshot problem");
    }
    metrics::record_snapshot_diagnostics(outcome.diagnostics.len());
}
