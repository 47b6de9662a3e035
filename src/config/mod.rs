//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → gateway section compiled into a RouteRegistry at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Route and action tables keep declaration order (declared.rs)

pub mod declared;
pub mod loader;
pub mod schema;
pub mod validation;

pub use declared::Declared;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ActionEntry, AdminConfig, AuthConfig, GatewayConfig, GatewaySection, GlobalConfig,
    ListenerConfig, LogFormat, ObservabilityConfig, RouteEntry, RouteSource, StorageConfig,
    TimeoutConfig,
};
