//! Configuration management for Scribe.
//!
//! TOML-based configuration with environment variable substitution
//! (`${VAR_NAME}`), `SCRIBE_*` overrides, defaults for optional settings,
//! and validation on load.
//!
//! # Example configuration
//!
//! ```toml
//! environment = "development"
//!
//! [application]
//! log_level = "info"
//!
//! [database]
//! connection_string = "${SCRIBE_DATABASE_URL}"
//! max_connections = 10
//!
//! [clinical]
//! settings_cache_ttl_seconds = 0
//! max_addendum_chain_depth = 8
//!
//! [logging]
//! local_enabled = true
//! local_path = "logs"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ClinicalConfig, DatabaseConfig, Environment, LoggingConfig, ScribeConfig,
};
