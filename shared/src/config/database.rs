//! Database configuration module

use serde::{Deserialize, Serialize};

/// Document database connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// MongoDB connection URI
    pub url: String,

    /// Database holding the token collection
    pub database: String,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Application name reported to the server
    #[serde(default)]
    pub app_name: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("mongodb://localhost:27017"),
            database: String::from("grantstore"),
            connect_timeout: 10,
            app_name: None,
        }
    }
}

impl DatabaseConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let url = std::env::var("MONGODB_URI").unwrap_or(defaults.url);
        let database = std::env::var("MONGODB_DATABASE").unwrap_or(defaults.database);
        let connect_timeout = std::env::var("MONGODB_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.connect_timeout);

        Self {
            url,
            database,
            connect_timeout,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
        }
    }

    /// Create a new database configuration with URI
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the database name
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the application name
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }
}
