use super::common::{
    created_response, json_body, no_content_response, query_params, success_response,
    validate_input,
};
use crate::errors::ServiceError;
use crate::models::{ClockIn, ClockInFilters, CreateClockInRequest, UpdateClockInRequest};
use crate::services::clock_ins::ClockInService;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, MethodRouter},
    Router,
};

pub trait ClockInHandlerState: Clone + Send + Sync + 'static {
    fn clock_in_service(&self) -> &ClockInService;
}

/// Create the clock-in router
pub fn clock_in_router<S>() -> Router<S>
where
    S: ClockInHandlerState,
{
    Router::new()
        .route("/", clock_in_collection_route())
        .route("/filter", get(filter_clock_ins::<S>))
        .route(
            "/:id",
            get(get_clock_in::<S>)
                .put(update_clock_in::<S>)
                .delete(delete_clock_in::<S>),
        )
}

pub fn clock_in_collection_route<S>() -> MethodRouter<S>
where
    S: ClockInHandlerState,
{
    get(filter_clock_ins::<S>).post(create_clock_in::<S>)
}

/// Record a clock-in
#[utoipa::path(
    post,
    path = "/clock-in",
    request_body = CreateClockInRequest,
    responses(
        (status = 201, description = "Clock-in recorded", body = ClockIn,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "clock-in"
)]
pub async fn create_clock_in<S>(
    State(state): State<S>,
    payload: Result<Json<CreateClockInRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ClockInHandlerState,
{
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let record = state.clock_in_service().create_clock_in(payload).await?;
    Ok(created_response(record))
}

#[utoipa::path(
    get,
    path = "/clock-in/{id}",
    params(
        ("id" = String, Path, description = "Clock-in record ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Clock-in record returned", body = ClockIn),
        (status = 400, description = "Invalid ID format", body = crate::errors::ErrorResponse),
        (status = 404, description = "Clock-In record not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "clock-in"
)]
pub async fn get_clock_in<S>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ClockInHandlerState,
{
    let record = state.clock_in_service().get_clock_in(&id).await?;
    Ok(success_response(record))
}

/// Filter clock-in records; every supplied parameter must match
#[utoipa::path(
    get,
    path = "/clock-in/filter",
    params(ClockInFilters),
    responses(
        (status = 200, description = "Matching clock-in records", body = [ClockIn]),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "clock-in"
)]
pub async fn filter_clock_ins<S>(
    State(state): State<S>,
    filters: Result<Query<ClockInFilters>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ClockInHandlerState,
{
    let filters = query_params(filters)?;
    validate_input(&filters)?;

    let records = state.clock_in_service().filter_clock_ins(filters).await?;
    Ok(success_response(records))
}

#[utoipa::path(
    put,
    path = "/clock-in/{id}",
    params(
        ("id" = String, Path, description = "Clock-in record ID (24-character hex)")
    ),
    request_body = UpdateClockInRequest,
    responses(
        (status = 200, description = "Clock-in record updated", body = ClockIn),
        (status = 400, description = "Invalid ID format or no fields provided", body = crate::errors::ErrorResponse),
        (status = 404, description = "Clock-In record not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "clock-in"
)]
pub async fn update_clock_in<S>(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateClockInRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ClockInHandlerState,
{
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let record = state
        .clock_in_service()
        .update_clock_in(&id, payload)
        .await?;
    Ok(success_response(record))
}

#[utoipa::path(
    delete,
    path = "/clock-in/{id}",
    params(
        ("id" = String, Path, description = "Clock-in record ID (24-character hex)")
    ),
    responses(
        (status = 204, description = "Clock-in record deleted"),
        (status = 400, description = "Invalid ID format", body = crate::errors::ErrorResponse),
        (status = 404, description = "Clock-In record not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "clock-in"
)]
pub async fn delete_clock_in<S>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ClockInHandlerState,
{
    state.clock_in_service().delete_clock_in(&id).await?;
    Ok(no_content_response())
}
