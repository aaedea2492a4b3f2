use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use vortex_api::{config::AppConfig, db::InMemoryStore, AppState};

/// Helper harness running the full router over a fresh in-memory store.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let cfg = AppConfig::new(
            "in-memory",
            "mongodb://localhost:27017",
            "127.0.0.1",
            18_000,
            "test",
        );
        let state = AppState::new(cfg, Arc::new(InMemoryStore::new()));
        let router = vortex_api::build_router(state.clone(), CorsLayer::permissive());

        Self { router, state }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Sends a request and decodes the JSON response body.
    #[allow(dead_code)]
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (u16, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status().as_u16();
        (status, response_json(response).await)
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json response")
}
