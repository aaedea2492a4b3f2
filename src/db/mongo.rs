use super::{DocumentCollection, DocumentStore, GroupCount, StoreError, ID_FIELD};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use futures::TryStreamExt;
use mongodb::{options::ClientOptions, Client, Collection, Database};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const APP_NAME: &str = "vortex-api";

/// MongoDB-backed document store.
///
/// One client is shared by every collection handle; the driver pools
/// connections internally.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub async fn connect(
        uri: &str,
        database: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        let database = client.database(database);
        Ok(Self { database })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoCollection::new(self.database.collection::<Document>(name)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct MongoCollection {
    inner: Collection<Document>,
}

impl MongoCollection {
    pub fn new(inner: Collection<Document>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn insert_one(&self, document: Document) -> Result<ObjectId, StoreError> {
        let result = self.inner.insert_one(document, None).await?;
        match result.inserted_id {
            Bson::ObjectId(id) => Ok(id),
            other => Err(StoreError::UnexpectedResponse(format!(
                "inserted id is not an ObjectId: {other}"
            ))),
        }
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        Ok(self.inner.find_one(doc! { ID_FIELD: id }, None).await?)
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let cursor = self.inner.find(filter, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!(
            collection = %self.inner.name(),
            count = documents.len(),
            "query returned documents"
        );
        Ok(documents)
    }

    async fn update_by_id(&self, id: ObjectId, fields: Document) -> Result<(), StoreError> {
        let result = self
            .inner
            .update_one(doc! { ID_FIELD: id }, doc! { "$set": fields }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<(), StoreError> {
        let result = self.inner.delete_one(doc! { ID_FIELD: id }, None).await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn count_by_field(&self, field: &str) -> Result<Vec<GroupCount>, StoreError> {
        let pipeline = vec![doc! {
            "$group": { ID_FIELD: format!("${field}"), "count": { "$sum": 1 } }
        }];
        let cursor = self.inner.aggregate(pipeline, None).await?;
        let groups: Vec<Document> = cursor.try_collect().await?;

        groups
            .into_iter()
            .map(|mut group| {
                let key = group.remove(ID_FIELD).unwrap_or(Bson::Null);
                let count = match group.get("count") {
                    Some(Bson::Int32(n)) => i64::from(*n),
                    Some(Bson::Int64(n)) => *n,
                    other => {
                        return Err(StoreError::UnexpectedResponse(format!(
                            "group count is not an integer: {other:?}"
                        )))
                    }
                };
                Ok(GroupCount { key, count })
            })
            .collect()
    }
}
