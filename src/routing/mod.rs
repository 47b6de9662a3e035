//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     gateway config section          routes.json snapshot
//!         → registry.rs (compile)         → persistence.rs (load)
//!         → RouteRegistry (ordered, unique ids)
//!         → binder.rs (one registration per route)
//!         → frozen behind Arc for the request path
//!
//! Request:
//!     axum match on (method, path)
//!     → auth → route context (route id)
//!     → gateway handler → get_route(id) → executor
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Actions keep declaration order; executors sort by `sequence`
//! - Route identifiers survive snapshot reloads unchanged
//! - Explicit `None` on lookup miss rather than a default route

pub mod action;
pub mod binder;
pub mod error;
pub mod identity;
pub mod persistence;
pub mod registry;
pub mod route;

pub use action::Action;
pub use binder::{Binding, BoundRouter, DispatchBinder};
pub use error::{BindError, CompileError, PersistenceError, RegistryError};
pub use identity::{IdGenerator, SequentialIds, UuidV4Generator};
pub use persistence::LoadOutcome;
pub use registry::RouteRegistry;
pub use route::Route;
