//! Serialized, timeout-bounded access to one named collection.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

use crate::context::OpContext;
use crate::errors::{StoreError, StoreResult};

use super::document::{Document, DocumentStore};

/// Default upper bound for a single backing store operation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Store adapter over a single collection of a [`DocumentStore`].
///
/// Every operation holds the instance lock for its whole duration, including
/// the backing store round trip, so operations on one adapter never overlap.
/// Each round trip is bounded by the adapter's timeout and by the caller's
/// context, whichever expires first.
///
/// The store handle is shared and never closed here.
pub struct DocumentCollection<S: ?Sized> {
    lock: Mutex<()>,
    name: String,
    timeout: Duration,
    store: Arc<S>,
}

impl<S> DocumentCollection<S>
where
    S: DocumentStore + ?Sized,
{
    pub fn new(store: Arc<S>, name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            lock: Mutex::new(()),
            name: name.into(),
            timeout,
            store,
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-operation timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Insert `record` as a new document.
    pub async fn put<R>(&self, ctx: &OpContext, record: &R) -> StoreResult<()>
    where
        R: Serialize + Sync + ?Sized,
    {
        let document = to_document(record)?;

        let _guard = self.acquire(ctx).await?;
        let op_ctx = ctx.child_with_timeout(self.timeout);
        let result = op_ctx.run(self.store.insert_one(&self.name, document)).await;

        match &result {
            Ok(()) => tracing::debug!(
                collection = %self.name,
                event = "document_inserted",
                "Inserted token document"
            ),
            Err(e) => tracing::warn!(
                collection = %self.name,
                error = %e,
                timed_out = e.is_timeout(),
                event = "document_insert_failed",
                "Failed to insert token document"
            ),
        }
        result
    }

    /// Fetch one document whose `key` equals `value` and decode it.
    ///
    /// Fails with [`StoreError::NotFound`] when nothing matches. With several
    /// matches the one returned is unspecified.
    pub async fn find_one<R>(&self, ctx: &OpContext, key: &str, value: &str) -> StoreResult<R>
    where
        R: DeserializeOwned,
    {
        let _guard = self.acquire(ctx).await?;
        let op_ctx = ctx.child_with_timeout(self.timeout);
        let found = op_ctx
            .run(self.store.find_one(&self.name, key, value))
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    collection = %self.name,
                    key,
                    error = %e,
                    timed_out = e.is_timeout(),
                    event = "document_lookup_failed",
                    "Failed to query token document"
                )
            })?;

        let Some(document) = found else {
            tracing::debug!(collection = %self.name, key, event = "document_not_found", "No document matched");
            return Err(StoreError::NotFound);
        };

        serde_json::from_value(Value::Object(document)).map_err(StoreError::Decode)
    }

    /// Delete one document whose `key` equals `value`.
    ///
    /// The backing store does the lookup and delete in one transaction; no
    /// match is not an error.
    pub async fn delete_one(&self, ctx: &OpContext, key: &str, value: &str) -> StoreResult<()> {
        let _guard = self.acquire(ctx).await?;
        let op_ctx = ctx.child_with_timeout(self.timeout);
        let deleted = op_ctx
            .run(self.store.delete_one(&self.name, key, value))
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    collection = %self.name,
                    key,
                    error = %e,
                    timed_out = e.is_timeout(),
                    event = "document_delete_failed",
                    "Failed to delete token document"
                )
            })?;

        tracing::debug!(
            collection = %self.name,
            key,
            deleted,
            event = "document_delete",
            "Processed token document removal"
        );
        Ok(())
    }

    /// Wait for the instance lock, giving up if the caller's context ends first.
    async fn acquire(&self, ctx: &OpContext) -> StoreResult<MutexGuard<'_, ()>> {
        ctx.run(async { Ok(self.lock.lock().await) }).await
    }
}

fn to_document<R>(record: &R) -> StoreResult<Document>
where
    R: Serialize + ?Sized,
{
    match serde_json::to_value(record).map_err(StoreError::Encode)? {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::Encode(serde::ser::Error::custom(
            "record must serialize to a document",
        ))),
    }
}
