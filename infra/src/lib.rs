//! # Infrastructure Layer
//!
//! Concrete backing store and process wiring for GrantStore.
//!
//! ## Architecture
//!
//! - **Database**: MongoDB implementation of `gs_core::store::DocumentStore`
//! - **Logging**: tracing subscriber setup from `LoggingConfig`
//! - **Configuration**: `.env` aware loading of `AppConfig`

// Re-export core types for convenience
pub use gs_core::errors::*;

/// Database module - MongoDB document store
pub mod database;

/// Logging module - tracing subscriber initialisation
pub mod logging;

pub use database::{connect, token_store, MongoDocumentStore};
pub use logging::init_tracing;

use gs_shared::config::AppConfig;

/// Load configuration from the environment
///
/// Reads a `.env` file first if one is present.
pub fn load_config() -> AppConfig {
    dotenvy::dotenv().ok(); // Load .env file if present
    AppConfig::from_env()
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
