use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const OPENAPI_JSON_PATH: &str = "/openapi.json";
pub const DOCS_PATH: &str = "/docs";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vortex API",
        version = "0.1.0",
        description = r#"
# Vortex API

CRUD backend for inventory items and employee clock-in records.

## Identifiers

Records are addressed by their 24-character hexadecimal store identifier.
Malformed identifiers are rejected with `400 Bad Request`.

## Error Handling

Failures share one body shape:

```json
{
  "error": "Not Found",
  "message": "Not found: Item not found",
  "request_id": "0b5e2a5c-9a1e-4c55-8d0e-7f1f1f0c3a11",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    tags(
        (name = "items", description = "Inventory item endpoints"),
        (name = "clock-in", description = "Clock-in record endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::items::create_item,
        crate::handlers::items::get_item,
        crate::handlers::items::filter_items,
        crate::handlers::items::update_item,
        crate::handlers::items::delete_item,
        crate::handlers::items::count_by_email,

        crate::handlers::clock_in::create_clock_in,
        crate::handlers::clock_in::get_clock_in,
        crate::handlers::clock_in::filter_clock_ins,
        crate::handlers::clock_in::update_clock_in,
        crate::handlers::clock_in::delete_clock_in,

        crate::health::health_check,
        crate::health::readiness_check,
    ),
    components(
        schemas(
            crate::models::Item,
            crate::models::CreateItemRequest,
            crate::models::UpdateItemRequest,
            crate::models::EmailCount,
            crate::models::ClockIn,
            crate::models::CreateClockInRequest,
            crate::models::UpdateClockInRequest,
            crate::health::HealthStatus,
            crate::health::HealthInfo,
            crate::health::ReadinessInfo,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from(OPENAPI_JSON_PATH).try_it_out_enabled(true))
}
