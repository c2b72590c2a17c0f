//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → MiddlewareConfig (validated, immutable)
//!     → CLI flags override selected fields in main
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; rules are installed once at startup
//! - All fields have defaults, so an absent file means "pass through"
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    LogFormat, MiddlewareConfig, ObservabilityConfig, ProcessingConfig, ReplayCheckConfig,
    RuleAction, RuleConfig, SweeperConfig,
};
pub use validation::{validate_config, ValidationError};
