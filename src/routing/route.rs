//! Addressable endpoints and their action lists.

use serde::{Deserialize, Serialize};

use crate::routing::action::Action;

/// An externally addressable `(method, path)` endpoint.
///
/// Actions keep the order they were added in. They are not sorted by
/// `sequence`; [`Route::execution_order`] gives the sorted view for
/// executors that need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    id: String,
    method: String,
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    actions: Vec<Action>,
}

impl Route {
    /// `path` is the fully composed external path; it is stored as given.
    pub fn new(id: impl Into<String>, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            path: path.into(),
            alias: None,
            actions: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Append an action. Duplicate aliases and sequence numbers are kept as-is.
    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Configuration key the route was declared under, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Actions in the order they were added.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions stably sorted by `sequence`; ties keep insertion order.
    pub fn execution_order(&self) -> Vec<&Action> {
        let mut ordered: Vec<&Action> = self.actions.iter().collect();
        ordered.sort_by_key(|a| a.sequence());
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_keep_insertion_order() {
        let mut route = Route::new("r1", "GET", "/orders");
        route.add_action(Action::new("/b", "svc-b", "GET").with_sequence(2).with_alias("b"));
        route.add_action(Action::new("/a", "svc-a", "GET").with_sequence(1).with_alias("a"));

        let declared: Vec<_> = route.actions().iter().map(Action::alias).collect();
        assert_eq!(declared, vec!["b", "a"]);

        let executed: Vec<_> = route.execution_order().into_iter().map(Action::alias).collect();
        assert_eq!(executed, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let mut route = Route::new("r1", "POST", "/x");
        let action = Action::new("/x", "svc", "POST").with_alias("same");
        route.add_action(action.clone());
        route.add_action(action.with_sequence(0));

        assert_eq!(route.actions().len(), 2);
        assert_eq!(route.actions()[0], route.actions()[1]);
    }

    #[test]
    fn test_equal_sequence_is_stable() {
        let mut route = Route::new("r1", "GET", "/x");
        for alias in ["first", "second", "third"] {
            route.add_action(Action::new("/x", "svc", "GET").with_alias(alias));
        }
        let executed: Vec<_> = route.execution_order().into_iter().map(Action::alias).collect();
        assert_eq!(executed, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_alias_is_optional_in_json() {
        let route = Route::new("r1", "GET", "/x");
        let json = serde_json::to_string(&route).unwrap();
        assert!(!json.contains("alias"));

        let decoded: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.alias(), None);
        assert_eq!(decoded, route);
    }
}
