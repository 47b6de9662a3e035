//! Route registry and route compilation.
//!
//! # Responsibilities
//! - Own every route known to the running gateway
//! - Compile the `gateway` config section into routes
//! - Look routes up by identifier
//!
//! # Design Decisions
//! - Insertion order is kept; it is the order routes are bound in
//! - Identifiers are unique per registry: `add_route` rejects collisions
//! - Immutable after binding; shared as `Arc<RouteRegistry>` while serving

use serde::Serialize;

use crate::config::schema::{ActionEntry, GatewaySection, RouteEntry};
use crate::routing::action::Action;
use crate::routing::binder::method_filter;
use crate::routing::error::{CompileError, RegistryError};
use crate::routing::identity::IdGenerator;
use crate::routing::route::Route;

/// The in-memory collection of routes for one gateway instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteRegistry {
    routes: Vec<Route>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile declared routes.
    ///
    /// Each route gets a fresh identifier and the path `prefix + path`. An
    /// empty section yields an empty registry.
    pub fn from_config(
        section: &GatewaySection,
        ids: &dyn IdGenerator,
    ) -> Result<Self, CompileError> {
        let mut registry = Self::new();
        let prefix = section.prefix();

        for (alias, entry) in section.routes.iter() {
            let route = compile_route(alias, entry, prefix, ids)?;
            tracing::debug!(
                route_id = %route.id(),
                alias = %alias,
                method = %route.method(),
                path = %route.path(),
                actions = route.actions().len(),
                "Route compiled"
            );
            registry.add_route(route)?;
        }

        Ok(registry)
    }

    /// Append a route. Fails if a route with the same identifier is held.
    pub fn add_route(&mut self, route: Route) -> Result<(), RegistryError> {
        if self.get_route(route.id()).is_some() {
            return Err(RegistryError::DuplicateRouteId(route.id().to_string()));
        }
        self.routes.push(route);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Routes in insertion order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route whose identifier equals `id`.
    pub fn get_route(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id() == id)
    }
}

fn compile_route(
    alias: &str,
    entry: &RouteEntry,
    prefix: &str,
    ids: &dyn IdGenerator,
) -> Result<Route, CompileError> {
    let missing = |field| CompileError::MissingField {
        route: alias.to_string(),
        action: None,
        field,
    };
    let method = entry.method.as_deref().ok_or_else(|| missing("method"))?;
    let path = entry.path.as_deref().ok_or_else(|| missing("path"))?;

    if method_filter(method).is_none() {
        return Err(CompileError::UnsupportedMethod {
            route: alias.to_string(),
            method: method.to_string(),
        });
    }

    let mut route = Route::new(ids.new_id(), method, format!("{}{}", prefix, path)).with_alias(alias);

    for (action_alias, action) in entry.actions.iter() {
        route.add_action(compile_action(alias, action_alias, action)?);
    }

    Ok(route)
}

fn compile_action(
    route: &str,
    alias: &str,
    entry: &ActionEntry,
) -> Result<Action, CompileError> {
    let require = |value: &Option<String>, field| {
        value.clone().ok_or_else(|| CompileError::MissingField {
            route: route.to_string(),
            action: Some(alias.to_string()),
            field,
        })
    };

    Ok(Action::new(
        require(&entry.path, "path")?,
        require(&entry.service, "service")?,
        require(&entry.method, "method")?,
    )
    .with_sequence(entry.sequence)
    .with_alias(alias)
    .with_critical(entry.critical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::GatewayConfig;
    use crate::routing::identity::SequentialIds;

    fn section(toml: &str) -> GatewaySection {
        toml::from_str::<GatewayConfig>(toml).unwrap().gateway
    }

    #[test]
    fn test_compiles_routes_and_actions() {
        let gateway = section(
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
            "#,
        );

        let registry = RouteRegistry::from_config(&gateway, &SequentialIds::new("r")).unwrap();
        assert_eq!(registry.len(), 1);

        let route = &registry.routes()[0];
        assert_eq!(route.id(), "r-1");
        assert_eq!(route.path(), "/api/users");
        assert_eq!(route.method(), "GET");
        assert_eq!(route.alias(), Some("users"));

        let action = &route.actions()[0];
        assert_eq!(action.service(), "user-svc");
        assert_eq!(action.url(), "/v1/users");
        assert_eq!(action.alias(), "lookup");
        assert_eq!(action.sequence(), 0);
        assert!(!action.is_critical());
    }

    #[test]
    fn test_default_prefix_is_concatenated_verbatim() {
        let gateway = section(
            r#"
            [gateway.routes.health]
            method = "GET"
            path = "/health"
            "#,
        );
        let registry = RouteRegistry::from_config(&gateway, &SequentialIds::new("r")).unwrap();
        assert_eq!(registry.routes()[0].path(), "//health");
        assert!(registry.routes()[0].actions().is_empty());
    }

    #[test]
    fn test_declaration_order_kept() {
        let gateway = section(
            r#"
            [gateway.routes.zeta]
            method = "GET"
            path = "/z"

            [gateway.routes.zeta.actions.second]
            service = "s"
            path = "/2"
            method = "GET"
            sequence = 2

            [gateway.routes.zeta.actions.first]
            service = "s"
            path = "/1"
            method = "GET"
            sequence = 1
            critical = true

            [gateway.routes.alpha]
            method = "POST"
            path = "/a"
            "#,
        );
        let registry = RouteRegistry::from_config(&gateway, &SequentialIds::new("r")).unwrap();

        let aliases: Vec<_> = registry.routes().iter().filter_map(Route::alias).collect();
        assert_eq!(aliases, vec!["zeta", "alpha"]);

        let actions: Vec<_> = registry.routes()[0].actions().iter().map(Action::alias).collect();
        assert_eq!(actions, vec!["second", "first"]);
        assert!(registry.routes()[0].actions()[1].is_critical());
    }

    #[test]
    fn test_empty_section() {
        let registry =
            RouteRegistry::from_config(&GatewaySection::default(), &SequentialIds::new("r")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_fields_are_typed_errors() {
        let gateway = section(
            r#"
            [gateway.routes.users]
            method = "GET"
            "#,
        );
        let err = RouteRegistry::from_config(&gateway, &SequentialIds::new("r")).unwrap_err();
        assert_eq!(
            err,
            CompileError::MissingField { route: "users".into(), action: None, field: "path" }
        );

        let gateway = section(
            r#"
            [gateway.routes.users]
            method = "GET"
            path = "/users"

            [gateway.routes.users.actions.lookup]
            path = "/v1/users"
            method = "GET"
            "#,
        );
        let err = RouteRegistry::from_config(&gateway, &SequentialIds::new("r")).unwrap_err();
        assert_eq!(
            err,
            CompileError::MissingField {
                route: "users".into(),
                action: Some("lookup".into()),
                field: "service"
            }
        );
    }

    #[test]
    fn test_unsupported_method() {
        let gateway = section(
            r#"
            [gateway.routes.odd]
            method = "BREW"
            path = "/coffee"
            "#,
        );
        let err = RouteRegistry::from_config(&gateway, &SequentialIds::new("r")).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedMethod { .. }));
    }

    #[test]
    fn test_colliding_generator_is_rejected() {
        struct Fixed;
        impl IdGenerator for Fixed {
            fn new_id(&self) -> String {
                "same".into()
            }
        }

        let gateway = section(
            r#"
            [gateway.routes.a]
            method = "GET"
            path = "/a"

            [gateway.routes.b]
            method = "GET"
            path = "/b"
            "#,
        );
        let err = RouteRegistry::from_config(&gateway, &Fixed).unwrap_err();
        assert_eq!(err, CompileError::Registry(RegistryError::DuplicateRouteId("same".into())));
    }

    #[test]
    fn test_lookup() {
        let mut registry = RouteRegistry::new();
        registry.add_route(Route::new("a", "GET", "/a")).unwrap();
        registry.add_route(Route::new("b", "GET", "/b")).unwrap();

        assert_eq!(registry.get_route("b").map(Route::path), Some("/b"));
        assert!(registry.get_route("missing").is_none());

        let err = registry.add_route(Route::new("a", "POST", "/other")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateRouteId("a".into()));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_route("a").map(Route::method), Some("GET"));
    }

    #[test]
    fn test_routes_view_is_a_copy_when_owned() {
        let mut registry = RouteRegistry::new();
        registry.add_route(Route::new("a", "GET", "/a")).unwrap();

        let mut view = registry.routes().to_vec();
        view.clear();
        assert_eq!(registry.len(), 1);
    }
}
