use super::common::{
    created_response, json_body, no_content_response, query_params, success_response,
    validate_input,
};
use crate::errors::ServiceError;
use crate::models::{CreateItemRequest, EmailCount, Item, ItemFilters, UpdateItemRequest};
use crate::services::items::ItemService;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, MethodRouter},
    Router,
};

// Trait for item handler state that provides access to the item service
pub trait ItemHandlerState: Clone + Send + Sync + 'static {
    fn item_service(&self) -> &ItemService;
}

/// Create the items router
pub fn items_router<S>() -> Router<S>
where
    S: ItemHandlerState,
{
    Router::new()
        .route("/", item_collection_route())
        .route("/filter", get(filter_items::<S>))
        .route("/aggregate/count-by-email", get(count_by_email::<S>))
        .route(
            "/:id",
            get(get_item::<S>)
                .put(update_item::<S>)
                .delete(delete_item::<S>),
        )
}

/// List and create, shared by `/items` and `/items/`
pub fn item_collection_route<S>() -> MethodRouter<S>
where
    S: ItemHandlerState,
{
    get(filter_items::<S>).post(create_item::<S>)
}

/// Create a new item
#[utoipa::path(
    post,
    path = "/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = Item,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item<S>(
    State(state): State<S>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ItemHandlerState,
{
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let item = state.item_service().create_item(payload).await?;
    Ok(created_response(item))
}

/// Get a single item by id
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(
        ("id" = String, Path, description = "Item ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Item returned", body = Item),
        (status = 400, description = "Invalid ID format", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item<S>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ItemHandlerState,
{
    let item = state.item_service().get_item(&id).await?;
    Ok(success_response(item))
}

/// Filter items; every supplied parameter must match
#[utoipa::path(
    get,
    path = "/items/filter",
    params(ItemFilters),
    responses(
        (status = 200, description = "Matching items", body = [Item]),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn filter_items<S>(
    State(state): State<S>,
    filters: Result<Query<ItemFilters>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ItemHandlerState,
{
    let filters = query_params(filters)?;
    validate_input(&filters)?;

    let items = state.item_service().filter_items(filters).await?;
    Ok(success_response(items))
}

/// Update the supplied fields of an item
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(
        ("id" = String, Path, description = "Item ID (24-character hex)")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, description = "Invalid ID format or no fields provided", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_item<S>(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ItemHandlerState,
{
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let item = state.item_service().update_item(&id, payload).await?;
    Ok(success_response(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(
        ("id" = String, Path, description = "Item ID (24-character hex)")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Invalid ID format", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item<S>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    S: ItemHandlerState,
{
    state.item_service().delete_item(&id).await?;
    Ok(no_content_response())
}

/// Count items per owner email
#[utoipa::path(
    get,
    path = "/items/aggregate/count-by-email",
    responses(
        (status = 200, description = "Item counts grouped by email", body = [EmailCount]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn count_by_email<S>(State(state): State<S>) -> Result<impl IntoResponse, ServiceError>
where
    S: ItemHandlerState,
{
    let counts = state.item_service().count_by_email().await?;
    Ok(success_response(counts))
}
