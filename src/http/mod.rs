//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, trace)
//!     → bound route: middleware.rs (auth, then route context)
//!     → server.rs gateway handler (registry lookup)
//!     → ActionExecutor (backend calls, outside this crate)
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{AuthPolicy, RouteContext};
pub use server::{ActionExecutor, DispatchPlan, GatewayServer, GatewayState, PlanExecutor, X_REQUEST_ID};
