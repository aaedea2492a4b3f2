pub mod memory;
pub mod mongo;
pub mod query_builder;

use crate::config::AppConfig;
use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub use memory::{InMemoryCollection, InMemoryStore};
pub use mongo::{MongoCollection, MongoStore};
pub use query_builder::FilterBuilder;

/// Field under which every document stores its identifier.
pub const ID_FIELD: &str = "_id";

/// Errors returned by the record store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Document {0} not found")]
    NotFound(ObjectId),

    #[error("Unsupported query operator: {0}")]
    UnsupportedQuery(String),

    #[error("Unexpected store response: {0}")]
    UnexpectedResponse(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Result of a group-by-field count aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCount {
    pub key: Bson,
    pub count: i64,
}

/// A single collection of documents.
///
/// Filters passed to [`DocumentCollection::find`] use the MongoDB query
/// subset produced by [`FilterBuilder`]: top-level field equality and the
/// `$eq`, `$gt`, `$gte`, `$lt` and `$lte` operators, AND-ed together.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Inserts a document and returns its store-assigned identifier.
    async fn insert_one(&self, document: Document) -> Result<ObjectId, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, StoreError>;

    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError>;

    /// Sets the given fields on the document with `id`.
    ///
    /// Returns [`StoreError::NotFound`] when no document matched.
    async fn update_by_id(&self, id: ObjectId, fields: Document) -> Result<(), StoreError>;

    /// Returns [`StoreError::NotFound`] when no document was removed.
    async fn delete_by_id(&self, id: ObjectId) -> Result<(), StoreError>;

    /// Groups every document by `field` and counts each group.
    async fn count_by_field(&self, field: &str) -> Result<Vec<GroupCount>, StoreError>;
}

/// A handle on a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn backend(&self) -> &'static str;

    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Parses a wire identifier into a store identifier.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Builds the store selected by the configuration.
///
/// The MongoDB client connects lazily, so construction only fails on a
/// malformed connection string.
pub async fn establish_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.store_backend.to_ascii_lowercase().as_str() {
        "in-memory" => {
            warn!("Using the in-memory document store; data is lost on shutdown");
            Ok(Arc::new(InMemoryStore::new()))
        }
        _ => {
            let store = MongoStore::connect(
                &config.mongo_uri,
                &config.database_name,
                Duration::from_secs(config.mongo_connect_timeout_secs),
            )
            .await?;
            info!(database = %config.database_name, "MongoDB client configured");
            Ok(Arc::new(store))
        }
    }
}
