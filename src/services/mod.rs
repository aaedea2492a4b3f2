//! Business services sitting between the HTTP handlers and the record store.

pub mod clock_ins;
pub mod items;

pub use clock_ins::ClockInService;
pub use items::ItemService;

use crate::errors::ServiceError;
use crate::db::StoreError;

/// Maps a store "not found" onto the resource-specific message and leaves
/// every other store error to the generic conversion.
pub(crate) fn store_error_for(resource_missing: &'static str) -> impl Fn(StoreError) -> ServiceError {
    move |err| match err {
        StoreError::NotFound(_) => ServiceError::NotFound(resource_missing.to_string()),
        other => ServiceError::from(other),
    }
}
