use super::store_error_for;
use crate::{
    codec::{clock_in as clock_in_codec, timestamp_to_bson},
    db::{parse_object_id, DocumentCollection, FilterBuilder},
    errors::ServiceError,
    models::{ClockIn, ClockInFilters, CreateClockInRequest, UpdateClockInRequest},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const CLOCK_IN_NOT_FOUND: &str = "Clock-In record not found";

/// Service for managing clock-in records
#[derive(Clone)]
pub struct ClockInService {
    collection: Arc<dyn DocumentCollection>,
}

impl ClockInService {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    /// Records a clock-in at the current instant
    #[instrument(skip(self))]
    pub async fn create_clock_in(
        &self,
        request: CreateClockInRequest,
    ) -> Result<ClockIn, ServiceError> {
        let document = clock_in_codec::encode_new(&request, Utc::now());
        let id = self.collection.insert_one(document).await?;

        let stored = self.collection.find_by_id(id).await?.ok_or_else(|| {
            ServiceError::InternalError(format!("Clock-in {id} vanished right after insert"))
        })?;
        let record = clock_in_codec::decode(&stored)?;

        info!(clock_in_id = %record.id, location = %record.location, "Clock-in recorded");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn get_clock_in(&self, id: &str) -> Result<ClockIn, ServiceError> {
        let object_id = parse_object_id(id)?;
        let document = self
            .collection
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(CLOCK_IN_NOT_FOUND.to_string()))?;
        Ok(clock_in_codec::decode(&document)?)
    }

    #[instrument(skip(self))]
    pub async fn filter_clock_ins(
        &self,
        filters: ClockInFilters,
    ) -> Result<Vec<ClockIn>, ServiceError> {
        let filter = FilterBuilder::new()
            .id(filters.id.as_deref())?
            .eq(clock_in_codec::EMAIL, filters.email.as_deref())
            .eq(clock_in_codec::LOCATION, filters.location.as_deref())
            .gt(
                clock_in_codec::INSERT_DATETIME,
                filters.insert_datetime.map(timestamp_to_bson),
            )
            .build();

        let documents = self.collection.find(filter).await?;
        debug!(count = documents.len(), "Clock-ins matched filter");

        documents
            .iter()
            .map(|document| clock_in_codec::decode(document).map_err(ServiceError::from))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn update_clock_in(
        &self,
        id: &str,
        request: UpdateClockInRequest,
    ) -> Result<ClockIn, ServiceError> {
        let object_id = parse_object_id(id)?;
        let fields = clock_in_codec::encode_update(&request);
        if fields.is_empty() {
            return Err(ServiceError::BadRequest(
                super::items::NO_FIELDS_TO_UPDATE.to_string(),
            ));
        }

        self.collection
            .update_by_id(object_id, fields)
            .await
            .map_err(store_error_for(CLOCK_IN_NOT_FOUND))?;

        let document = self
            .collection
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(CLOCK_IN_NOT_FOUND.to_string()))?;

        info!(clock_in_id = %id, "Clock-in updated");
        Ok(clock_in_codec::decode(&document)?)
    }

    #[instrument(skip(self))]
    pub async fn delete_clock_in(&self, id: &str) -> Result<(), ServiceError> {
        let object_id = parse_object_id(id)?;
        self.collection
            .delete_by_id(object_id)
            .await
            .map_err(store_error_for(CLOCK_IN_NOT_FOUND))?;
        info!(clock_in_id = %id, "Clock-in deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryCollection;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn service() -> ClockInService {
        ClockInService::new(Arc::new(InMemoryCollection::new("clock_in_records")))
    }

    fn request(email: &str, location: &str) -> CreateClockInRequest {
        CreateClockInRequest {
            email: email.into(),
            location: location.into(),
        }
    }

    #[tokio::test]
    async fn partial_update_keeps_untouched_fields() {
        let service = service();
        let created = service
            .create_clock_in(request("a@x.com", "NYC"))
            .await
            .unwrap();

        let updated = service
            .update_clock_in(
                &created.id,
                UpdateClockInRequest {
                    location: Some("LA".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.location, "LA");
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.insert_datetime, created.insert_datetime);
    }

    #[tokio::test]
    async fn filters_by_location_and_time() {
        let service = service();
        service
            .create_clock_in(request("a@x.com", "NYC"))
            .await
            .unwrap();
        service
            .create_clock_in(request("b@x.com", "LA"))
            .await
            .unwrap();

        let in_nyc = service
            .filter_clock_ins(ClockInFilters {
                location: Some("NYC".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(in_nyc.len(), 1);
        assert_eq!(in_nyc[0].email, "a@x.com");

        let future = service
            .filter_clock_ins(ClockInFilters {
                insert_datetime: Some(Utc::now() + Duration::hours(1)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(future.is_empty());

        let past = service
            .filter_clock_ins(ClockInFilters {
                insert_datetime: Some(Utc::now() - Duration::hours(1)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(past.len(), 2);
    }

    #[tokio::test]
    async fn malformed_id_filter_is_a_bad_request() {
        let result = service()
            .filter_clock_ins(ClockInFilters {
                id: Some("xyz".into()),
                ..Default::default()
            })
            .await;
        assert_matches!(result, Err(ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn deleted_records_are_gone() {
        let service = service();
        let created = service
            .create_clock_in(request("a@x.com", "NYC"))
            .await
            .unwrap();

        service.delete_clock_in(&created.id).await.unwrap();
        assert_matches!(
            service.get_clock_in(&created.id).await,
            Err(ServiceError::NotFound(msg)) if msg == CLOCK_IN_NOT_FOUND
        );
    }
}
