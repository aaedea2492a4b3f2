use super::store_error_for;
use crate::{
    codec::{date_to_bson, item as item_codec},
    db::{parse_object_id, DocumentCollection, FilterBuilder},
    errors::ServiceError,
    models::{CreateItemRequest, EmailCount, Item, ItemFilters, UpdateItemRequest},
};
use bson::Bson;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const ITEM_NOT_FOUND: &str = "Item not found";
pub const NO_FIELDS_TO_UPDATE: &str = "No fields provided for update";

/// Service for managing inventory items
#[derive(Clone)]
pub struct ItemService {
    collection: Arc<dyn DocumentCollection>,
}

impl ItemService {
    /// Creates a new item service over the given collection
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    /// Creates an item stamped with today's date and returns it as stored
    #[instrument(skip(self))]
    pub async fn create_item(&self, request: CreateItemRequest) -> Result<Item, ServiceError> {
        let document = item_codec::encode_new(&request, Utc::now());
        let id = self.collection.insert_one(document).await?;

        let stored = self.collection.find_by_id(id).await?.ok_or_else(|| {
            ServiceError::InternalError(format!("Item {id} vanished right after insert"))
        })?;
        let item = item_codec::decode(&stored)?;

        info!(item_id = %item.id, "Item created");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: &str) -> Result<Item, ServiceError> {
        let object_id = parse_object_id(id)?;
        let document = self
            .collection
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ITEM_NOT_FOUND.to_string()))?;
        Ok(item_codec::decode(&document)?)
    }

    /// Returns every item matching all of the supplied filters
    #[instrument(skip(self))]
    pub async fn filter_items(&self, filters: ItemFilters) -> Result<Vec<Item>, ServiceError> {
        let filter = FilterBuilder::new()
            .id(filters.id.as_deref())?
            .eq(item_codec::EMAIL, filters.email.as_deref())
            .gt(item_codec::EXPIRY_DATE, filters.expiry_date.map(date_to_bson))
            .gt(item_codec::INSERT_DATE, filters.insert_date.map(date_to_bson))
            .gte(item_codec::QUANTITY, filters.quantity)
            .build();

        let documents = self.collection.find(filter).await?;
        debug!(count = documents.len(), "Items matched filter");

        documents
            .iter()
            .map(|document| item_codec::decode(document).map_err(ServiceError::from))
            .collect()
    }

    /// Applies the supplied fields and returns the updated item
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        id: &str,
        request: UpdateItemRequest,
    ) -> Result<Item, ServiceError> {
        let object_id = parse_object_id(id)?;
        let fields = item_codec::encode_update(&request);
        if fields.is_empty() {
            return Err(ServiceError::BadRequest(NO_FIELDS_TO_UPDATE.to_string()));
        }

        self.collection
            .update_by_id(object_id, fields)
            .await
            .map_err(store_error_for(ITEM_NOT_FOUND))?;

        // A delete racing the update surfaces as not found.
        let document = self
            .collection
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ITEM_NOT_FOUND.to_string()))?;

        info!(item_id = %id, "Item updated");
        Ok(item_codec::decode(&document)?)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> Result<(), ServiceError> {
        let object_id = parse_object_id(id)?;
        self.collection
            .delete_by_id(object_id)
            .await
            .map_err(store_error_for(ITEM_NOT_FOUND))?;
        info!(item_id = %id, "Item deleted");
        Ok(())
    }

    /// Number of items per owner email, largest groups first
    #[instrument(skip(self))]
    pub async fn count_by_email(&self) -> Result<Vec<EmailCount>, ServiceError> {
        let groups = self.collection.count_by_field(item_codec::EMAIL).await?;

        let mut counts: Vec<EmailCount> = groups
            .into_iter()
            .map(|group| EmailCount {
                email: match group.key {
                    Bson::String(email) => Some(email),
                    Bson::Null => None,
                    other => Some(other.to_string()),
                },
                count: group.count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.email.cmp(&b.email)));
        Ok(counts)
    }
}
