//! Configuration loading and parsing
//!
//! Loads the control configuration from flash or embedded defaults.
//! TOML text is parsed by a small no_std parser.

pub mod loader;
pub mod toml;

pub use loader::{log_config_summary, ConfigLoadError, ConfigPersistence, ConfigSource};
pub use toml::parse_config;
