/*!
 * # Health Check Module
 *
 * - Basic health check (`/health`) - the process is up and serving
 * - Readiness check (`/health/ready`) - the record store answers a ping
 */

use crate::db::DocumentStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};
use utoipa::ToSchema;

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ReadinessInfo {
    pub ready: bool,
    /// Store backend in use ("mongo" or "in-memory")
    pub store: String,
    pub store_status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub trait HealthHandlerState: Clone + Send + Sync + 'static {
    fn store(&self) -> &Arc<dyn DocumentStore>;
    fn started_at(&self) -> Instant;
}

fn uptime(started_at: Instant) -> Duration {
    Instant::now().saturating_duration_since(started_at)
}

/// Basic health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthInfo)),
    tag = "health"
)]
pub async fn health_check<S>(State(state): State<S>) -> impl IntoResponse
where
    S: HealthHandlerState,
{
    debug!("Health check endpoint called");
    Json(HealthInfo {
        status: HealthStatus::Up,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds: uptime(state.started_at()).as_secs(),
    })
}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Record store reachable", body = ReadinessInfo),
        (status = 503, description = "Record store unreachable", body = ReadinessInfo)
    ),
    tag = "health"
)]
pub async fn readiness_check<S>(State(state): State<S>) -> impl IntoResponse
where
    S: HealthHandlerState,
{
    let store = state.store();
    let (status_code, store_status, message) = match store.ping().await {
        Ok(()) => (StatusCode::OK, HealthStatus::Up, None),
        Err(e) => {
            error!("Record store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthStatus::Down,
                Some(e.to_string()),
            )
        }
    };

    (
        status_code,
        Json(ReadinessInfo {
            ready: store_status == HealthStatus::Up,
            store: store.backend().to_string(),
            store_status,
            message,
            timestamp: Utc::now(),
        }),
    )
}

/// Creates router with health check endpoints
pub fn health_routes<S>() -> Router<S>
where
    S: HealthHandlerState,
{
    Router::new()
        .route("/health", get(health_check::<S>))
        .route("/health/ready", get(readiness_check::<S>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DocumentCollection, InMemoryStore, StoreError};
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[derive(Clone)]
    struct TestState {
        store: Arc<dyn DocumentStore>,
        started_at: Instant,
    }

    impl HealthHandlerState for TestState {
        fn store(&self) -> &Arc<dyn DocumentStore> {
            &self.store
        }

        fn started_at(&self) -> Instant {
            self.started_at
        }
    }

    struct UnreachableStore;

    #[async_trait]
    impl DocumentStore for UnreachableStore {
        fn backend(&self) -> &'static str {
            "mongo"
        }

        fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
            InMemoryStore::new().collection(name)
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::UnexpectedResponse("server selection timed out".into()))
        }
    }

    fn app(store: Arc<dyn DocumentStore>) -> Router {
        health_routes().with_state(TestState {
            store,
            started_at: Instant::now(),
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn health_reports_up() {
        let (status, body) = get(app(Arc::new(InMemoryStore::new())), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "up");
    }

    #[tokio::test]
    async fn readiness_follows_store_ping() {
        let (status, body) = get(app(Arc::new(InMemoryStore::new())), "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
        assert_eq!(body["store"], "in-memory");

        let (status, body) = get(app(Arc::new(UnreachableStore)), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["ready"], false);
        assert_eq!(body["store_status"], "down");
    }
}
