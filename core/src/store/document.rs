//! Backing document store seam.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::StoreResult;

/// A schema-flexible, field-name-keyed document.
pub type Document = Map<String, Value>;

/// Minimal contract a document database must offer to hold tokens.
///
/// Implementations own connection management and encoding to their native
/// format. Errors they produce should be wrapped with
/// [`StoreError::backend`](crate::errors::StoreError::backend) so callers can
/// inspect the original error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `document` as a new document in `collection`.
    ///
    /// Always creates a document; the store assigns its identity.
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()>;

    /// Fetch one document whose string field `key` equals `value`.
    ///
    /// When several documents match, which one is returned is unspecified.
    async fn find_one(
        &self,
        collection: &str,
        key: &str,
        value: &str,
    ) -> StoreResult<Option<Document>>;

    /// Locate the first document whose `key` equals `value` and delete it by
    /// its store-assigned id, atomically with respect to other writers.
    ///
    /// Returns `false` when nothing matched.
    async fn delete_one(&self, collection: &str, key: &str, value: &str) -> StoreResult<bool>;
}
