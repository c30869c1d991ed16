//! MongoDB client construction
//!
//! Builds a [`MongoDocumentStore`] from [`DatabaseConfig`] and wires it into a
//! [`DocumentTokenStore`].

use std::sync::Arc;
use std::time::Duration;

use mongodb::options::ClientOptions;
use mongodb::Client;

use gs_core::domain::entities::TokenRecord;
use gs_core::repositories::DocumentTokenStore;
use gs_shared::config::{DatabaseConfig, TokenStoreConfig};

use super::mongo::MongoDocumentStore;
use crate::InfrastructureError;

/// Connect to MongoDB and verify the server answers
///
/// # Arguments
/// * `config` - Database configuration settings
///
/// # Returns
/// * `Result<MongoDocumentStore, InfrastructureError>` - Connected store or error
///
/// # Example
/// ```no_run
/// use gs_infra::database::connect;
/// use gs_shared::config::DatabaseConfig;
///
/// async fn open() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::new("mongodb://localhost:27017/?replicaSet=rs0")
///         .with_database("oauth");
///     let store = connect(&config).await?;
///     println!("connected to {}", store.database());
///     Ok(())
/// }
/// ```
pub async fn connect(config: &DatabaseConfig) -> Result<MongoDocumentStore, InfrastructureError> {
    tracing::info!(
        database = %config.database,
        connect_timeout = config.connect_timeout,
        "Connecting to MongoDB"
    );

    let mut options = ClientOptions::parse(&config.url)
        .await
        .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout));
    options.server_selection_timeout = Some(Duration::from_secs(config.connect_timeout));
    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;
    let store = MongoDocumentStore::new(client, config.database.clone());

    store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "MongoDB health check failed");
        InfrastructureError::Database(e)
    })?;

    tracing::info!(database = %config.database, "MongoDB connection established");
    Ok(store)
}

/// Connect and build a token store over the configured collection
pub async fn token_store(
    database: &DatabaseConfig,
    token_store: &TokenStoreConfig,
) -> Result<DocumentTokenStore<MongoDocumentStore>, InfrastructureError> {
    if token_store.collection.is_empty() {
        return Err(InfrastructureError::Config(
            "Token collection name must not be empty".to_string(),
        ));
    }

    let store = connect(database)
        .await?
        .with_date_fields(TokenRecord::TIMESTAMP_FIELDS);
    Ok(DocumentTokenStore::from_config(Arc::new(store), token_store))
}
