//! Token store backed by a document collection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gs_shared::config::TokenStoreConfig;

use crate::context::OpContext;
use crate::domain::entities::record::{TokenKey, TokenRecord};
use crate::domain::entities::token::TokenInfo;
use crate::errors::{StoreError, StoreResult};
use crate::store::{DocumentCollection, DocumentStore, DEFAULT_TIMEOUT};

use super::r#trait::TokenStore;

/// [`TokenStore`] over one collection of a [`DocumentStore`]
///
/// Grants are stored one document per [`TokenStore::create`] call. Lookups and
/// removals query the `Code`, `Access` or `Refresh` field and act on a single
/// matching document.
pub struct DocumentTokenStore<S: ?Sized> {
    collection: DocumentCollection<S>,
}

impl<S> DocumentTokenStore<S>
where
    S: DocumentStore + ?Sized,
{
    /// Create a token store with the default 30 second operation timeout
    ///
    /// The store handle is shared and never closed by the token store.
    pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self::with_timeout(store, collection, DEFAULT_TIMEOUT)
    }

    /// Create a token store whose backing store operations are abandoned
    /// after `timeout`
    pub fn with_timeout(store: Arc<S>, collection: impl Into<String>, timeout: Duration) -> Self {
        Self {
            collection: DocumentCollection::new(store, collection, timeout),
        }
    }

    /// Create a token store from configuration
    pub fn from_config(store: Arc<S>, config: &TokenStoreConfig) -> Self {
        Self::with_timeout(store, config.collection.clone(), config.timeout())
    }

    /// The underlying store adapter
    pub fn collection(&self) -> &DocumentCollection<S> {
        &self.collection
    }

    async fn get_by(&self, ctx: &OpContext, key: TokenKey, value: &str) -> StoreResult<TokenInfo> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }
        // An empty key means the grant never carried that token.
        if value.is_empty() {
            return Err(StoreError::NotFound);
        }

        let record: TokenRecord = self.collection.find_one(ctx, key.field(), value).await?;
        Ok(record.into())
    }

    async fn remove_by(&self, ctx: &OpContext, key: TokenKey, value: &str) -> StoreResult<()> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }
        if value.is_empty() {
            return Ok(());
        }

        self.collection.delete_one(ctx, key.field(), value).await
    }
}

#[async_trait]
impl<S> TokenStore for DocumentTokenStore<S>
where
    S: DocumentStore + ?Sized,
{
    async fn create(&self, ctx: &OpContext, info: &TokenInfo) -> StoreResult<()> {
        let record = TokenRecord::try_from(info).inspect_err(|_| {
            tracing::warn!(
                collection = %self.collection.name(),
                event = "token_rejected",
                "Rejected zero-valued token info"
            )
        })?;

        self.collection.put(ctx, &record).await
    }

    async fn get_by_code(&self, ctx: &OpContext, code: &str) -> StoreResult<TokenInfo> {
        self.get_by(ctx, TokenKey::Code, code).await
    }

    async fn get_by_access(&self, ctx: &OpContext, access: &str) -> StoreResult<TokenInfo> {
        self.get_by(ctx, TokenKey::Access, access).await
    }

    async fn get_by_refresh(&self, ctx: &OpContext, refresh: &str) -> StoreResult<TokenInfo> {
        self.get_by(ctx, TokenKey::Refresh, refresh).await
    }

    async fn remove_by_code(&self, ctx: &OpContext, code: &str) -> StoreResult<()> {
        self.remove_by(ctx, TokenKey::Code, code).await
    }

    async fn remove_by_access(&self, ctx: &OpContext, access: &str) -> StoreResult<()> {
        self.remove_by(ctx, TokenKey::Access, access).await
    }

    async fn remove_by_refresh(&self, ctx: &OpContext, refresh: &str) -> StoreResult<()> {
        self.remove_by(ctx, TokenKey::Refresh, refresh).await
    }
}
