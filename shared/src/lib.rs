//! Shared configuration types for GrantStore
//!
//! This crate provides the settings used across the workspace:
//! - Document database connection configuration
//! - Token store collection and timeout configuration
//! - Environment detection and logging configuration

pub mod config;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, TokenStoreConfig,
};
