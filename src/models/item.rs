use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// An inventory item as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    #[schema(example = "665f1c2ab9e1d2a3c4b5d6e7")]
    pub id: String,
    #[schema(example = "Apple")]
    pub name: String,
    #[schema(example = "owner@example.com")]
    pub email: String,
    #[schema(example = 10)]
    pub quantity: i64,
    #[schema(example = "2024-12-31")]
    pub expiry_date: Option<NaiveDate>,
    /// Date the item was created, assigned by the server
    #[schema(example = "2024-06-01")]
    pub insert_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[schema(example = "Apple")]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "owner@example.com")]
    pub email: String,
    #[validate(range(min = 0, message = "quantity must be greater than or equal to 0"))]
    #[schema(example = 10)]
    pub quantity: i64,
    #[schema(example = "2024-12-31")]
    pub expiry_date: NaiveDate,
}

/// Partial update; absent and null fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(range(min = 0, message = "quantity must be greater than or equal to 0"))]
    pub quantity: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemFilters {
    /// Exact match on the item identifier
    #[serde(default, deserialize_with = "super::deserialize_optional_text")]
    pub id: Option<String>,
    /// Exact match for email
    #[validate(email(message = "email must be a valid email address"))]
    #[serde(default, deserialize_with = "super::deserialize_optional_text")]
    pub email: Option<String>,
    /// Items expiring after this date (YYYY-MM-DD)
    pub expiry_date: Option<NaiveDate>,
    /// Items inserted after this date (YYYY-MM-DD)
    pub insert_date: Option<NaiveDate>,
    /// Quantity greater than or equal to this number
    #[validate(range(min = 0, message = "quantity must be greater than or equal to 0"))]
    pub quantity: Option<i64>,
}

/// Number of items owned by one email address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmailCount {
    pub email: Option<String>,
    pub count: i64,
}
