use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A clock-in record as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClockIn {
    #[schema(example = "665f1c2ab9e1d2a3c4b5d6e7")]
    pub id: String,
    #[schema(example = "worker@example.com")]
    pub email: String,
    #[schema(example = "New York")]
    pub location: String,
    /// Moment of clocking in, assigned by the server
    pub insert_datetime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateClockInRequest {
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "worker@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "location must not be empty"))]
    #[schema(example = "New York")]
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateClockInRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClockInFilters {
    /// Exact match on the record identifier
    #[serde(default, deserialize_with = "super::deserialize_optional_text")]
    pub id: Option<String>,
    /// Exact match for email
    #[validate(email(message = "email must be a valid email address"))]
    #[serde(default, deserialize_with = "super::deserialize_optional_text")]
    pub email: Option<String>,
    /// Exact match for location
    #[serde(default, deserialize_with = "super::deserialize_optional_text")]
    pub location: Option<String>,
    /// Clock-ins after this datetime (ISO format)
    #[serde(default, deserialize_with = "super::deserialize_optional_timestamp")]
    pub insert_datetime: Option<DateTime<Utc>>,
}
