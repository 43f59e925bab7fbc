//! Configuration management for crawlstore
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use crawlstore::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Store lives at: {}", config.store.path.display());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `CRAWLSTORE__<section>__<key>`
//!
//! Examples:
//! - `CRAWLSTORE__STORE__PATH=/var/lib/crawl`
//! - `CRAWLSTORE__STORE__OPEN_TIMEOUT_MS=2000`
//! - `CRAWLSTORE__LOGGING__LEVEL=debug`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/crawlstore.toml`.
//! This can be overridden using the `CRAWLSTORE_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use crate::humanize::{ByteSize, FileMode};
pub use models::{Config, Durability, LogFormat, LoggingConfig, StoreConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`CRAWLSTORE__*`)
    /// 2. TOML file (default: `config/crawlstore.toml`)
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Check a configuration assembled in code
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self)?;
        Ok(())
    }
}
