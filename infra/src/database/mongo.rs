//! MongoDB implementation of the DocumentStore trait.
//!
//! Documents are converted between `serde_json` objects and BSON at this
//! boundary. Fields registered with [`MongoDocumentStore::with_date_fields`]
//! are written as native BSON dates (millisecond precision) so they can back
//! TTL indexes and range queries; dates read back become RFC 3339 strings.
//! Removal runs inside a client-session transaction so the lookup
//! and the delete by `_id` are atomic with respect to other transactional
//! writers; this requires a replica set or sharded cluster.

use async_trait::async_trait;
use mongodb::bson::{self, doc, Bson, Document as BsonDocument};
use mongodb::{Client, ClientSession, Collection};
use serde_json::Value;

use gs_core::errors::{StoreError, StoreResult};
use gs_core::store::{Document, DocumentStore};

/// MongoDB-backed document store
///
/// Wraps a shared [`Client`]; cloning the client is cheap and the store never
/// shuts it down.
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    client: Client,
    database: String,
    date_fields: Vec<String>,
}

impl MongoDocumentStore {
    /// Create a store over `database` using an existing client
    pub fn new(client: Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
            date_fields: Vec::new(),
        }
    }

    /// Store these top-level RFC 3339 string fields as BSON dates
    pub fn with_date_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.date_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Database name
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Check that the server answers a `ping`
    pub async fn health_check(&self) -> Result<(), mongodb::error::Error> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.client.database(&self.database).collection(name)
    }

    async fn delete_in_session(
        &self,
        session: &mut ClientSession,
        collection: &str,
        filter: BsonDocument,
    ) -> Result<bool, mongodb::error::Error> {
        let coll = self.collection(collection);
        let found = coll.find_one(filter).session(&mut *session).await?;
        let Some(id) = found.and_then(|d| d.get("_id").cloned()) else {
            return Ok(false);
        };
        let result = coll.delete_one(doc! { "_id": id }).session(&mut *session).await?;
        Ok(result.deleted_count > 0)
    }
}

fn equality_filter(key: &str, value: &str) -> BsonDocument {
    let mut filter = BsonDocument::new();
    filter.insert(key, value);
    filter
}

fn to_bson(document: &Document, date_fields: &[String]) -> StoreResult<BsonDocument> {
    let mut document = bson::to_document(document).map_err(StoreError::backend)?;
    for field in date_fields {
        let date = match document.get(field) {
            Some(Bson::String(text)) => {
                bson::DateTime::parse_rfc3339_str(text).map_err(StoreError::backend)?
            }
            _ => continue,
        };
        document.insert(field.clone(), date);
    }
    Ok(document)
}

fn from_bson(mut document: BsonDocument) -> StoreResult<Document> {
    document.remove("_id");
    for (_, value) in document.iter_mut() {
        if let Bson::DateTime(date) = value {
            let text = date.try_to_rfc3339_string().map_err(StoreError::backend)?;
            *value = Bson::String(text);
        }
    }
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Decode(serde::de::Error::custom(format!(
            "expected a document, got {other}"
        )))),
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        let document = to_bson(&document, &self.date_fields)?;
        self.collection(collection)
            .insert_one(document)
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        key: &str,
        value: &str,
    ) -> StoreResult<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(equality_filter(key, value))
            .await
            .map_err(StoreError::backend)?;
        found.map(from_bson).transpose()
    }

    async fn delete_one(&self, collection: &str, key: &str, value: &str) -> StoreResult<bool> {
        let mut session = self.client.start_session().await.map_err(StoreError::backend)?;
        session.start_transaction().await.map_err(StoreError::backend)?;

        match self
            .delete_in_session(&mut session, collection, equality_filter(key, value))
            .await
        {
            Ok(deleted) => {
                session.commit_transaction().await.map_err(StoreError::backend)?;
                Ok(deleted)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    tracing::warn!(
                        collection,
                        error = %abort_err,
                        "Failed to abort token removal transaction"
                    );
                }
                Err(StoreError::backend(e))
            }
        }
    }
}
