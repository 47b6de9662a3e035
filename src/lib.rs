//! API gateway routing core.
//!
//! Turns declarative route definitions into a dispatch table mapping an
//! inbound `(method, path)` to an ordered list of backend actions, persists
//! and reloads that table, and binds it into an axum router.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod storage;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use routing::{Action, Route, RouteRegistry};
