//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout in pretty, compact or JSON form)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (route_id, path, request_id)
//! - Request ID flows from the request-id layer into handler logs
//! - Metrics are cheap when no recorder is installed

pub mod logging;
pub mod metrics;
