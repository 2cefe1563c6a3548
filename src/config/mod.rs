//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → PB_* environment overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → BalancerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow running with no config at all
//! - Environment beats file, file beats defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BalancerConfig;
pub use schema::{LifecycleConfig, ListenerConfig, ObservabilityConfig, QueueConfig, TimeoutConfig};
