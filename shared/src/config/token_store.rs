//! Token store configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-operation timeout in seconds
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 30;

/// Default collection holding token documents
pub const DEFAULT_COLLECTION: &str = "oauth2_tokens";

/// Token store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenStoreConfig {
    /// Top-level collection name
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Upper bound for every backing store operation, in seconds
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout: u64,
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            operation_timeout: default_operation_timeout(),
        }
    }
}

impl TokenStoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let collection = std::env::var("TOKEN_COLLECTION").unwrap_or_else(|_| default_collection());
        let operation_timeout = std::env::var("TOKEN_STORE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_OPERATION_TIMEOUT_SECS);

        Self {
            collection,
            operation_timeout,
        }
    }

    /// Create a configuration for the given collection
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Default::default()
        }
    }

    /// Set the per-operation timeout in seconds
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.operation_timeout = secs;
        self
    }

    /// Per-operation timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout)
    }
}

fn default_collection() -> String {
    String::from(DEFAULT_COLLECTION)
}

fn default_operation_timeout() -> u64 {
    DEFAULT_OPERATION_TIMEOUT_SECS
}
