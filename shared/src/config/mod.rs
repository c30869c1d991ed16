//! Configuration module
//!
//! - `database` - Document database connection settings
//! - `environment` - Environment detection and logging configuration
//! - `token_store` - Collection and timeout settings for the token store

pub mod database;
pub mod environment;
pub mod token_store;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use token_store::{TokenStoreConfig, DEFAULT_COLLECTION, DEFAULT_OPERATION_TIMEOUT_SECS};

/// Complete configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token store configuration
    #[serde(default)]
    pub token_store: TokenStoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            database: DatabaseConfig::default(),
            token_store: TokenStoreConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            database: DatabaseConfig::from_env(),
            token_store: TokenStoreConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }
}
