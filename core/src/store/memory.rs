//! In-process document store for tests and local development

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};

use super::document::{Document, DocumentStore};

/// Error injected into the next round trip via [`MemoryDocumentStore::fail_next`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("memory store failure: {0}")]
pub struct MemoryStoreError(pub String);

struct StoredDocument {
    id: Uuid,
    body: Document,
}

/// Document store kept in a map of collections.
///
/// Besides storing documents it counts round trips and the peak number of
/// concurrent round trips, and can simulate latency and failures.
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
    latency: Option<Duration>,
    failure: StdMutex<Option<MemoryStoreError>>,
    round_trips: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            latency: None,
            failure: StdMutex::new(None),
            round_trips: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Delay every round trip by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next round trip fail with `message`
    pub fn fail_next(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(MemoryStoreError(message.into()));
        }
    }

    /// Number of round trips started so far
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Highest number of round trips observed running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Number of documents in `collection`
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    /// Number of documents in `collection` whose `key` equals `value`
    pub async fn count_matching(&self, collection: &str, key: &str, value: &str) -> usize {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map_or(0, |docs| docs.iter().filter(|d| matches(&d.body, key, value)).count())
    }

    async fn begin(&self) -> StoreResult<InFlight<'_>> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let injected = self.failure.lock().ok().and_then(|mut failure| failure.take());
        match injected {
            Some(err) => Err(StoreError::backend(err)),
            None => Ok(guard),
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight gauge even when the round trip is dropped mid-way.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn matches(document: &Document, key: &str, value: &str) -> bool {
    document.get(key).and_then(Value::as_str) == Some(value)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        let _in_flight = self.begin().await?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: Uuid::new_v4(),
                body: document,
            });
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        key: &str,
        value: &str,
    ) -> StoreResult<Option<Document>> {
        let _in_flight = self.begin().await?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches(&d.body, key, value)))
            .map(|d| d.body.clone()))
    }

    async fn delete_one(&self, collection: &str, key: &str, value: &str) -> StoreResult<bool> {
        let _in_flight = self.begin().await?;
        // The write lock spans lookup and removal, standing in for a transaction.
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(id) = docs.iter().find(|d| matches(&d.body, key, value)).map(|d| d.id) else {
            return Ok(false);
        };
        docs.retain(|d| d.id != id);
        Ok(true)
    }
}
