//! Vortex API Library
//!
//! CRUD backend for inventory items and clock-in records stored in a
//! document database.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod codec;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use http::HeaderValue;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::db::DocumentStore;
use crate::handlers::{ClockInHandlerState, ItemHandlerState};
use crate::health::HealthHandlerState;
use crate::services::{ClockInService, ItemService};

pub const ROOT_BANNER: &str = "vortex-api up";

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: Arc<dyn DocumentStore>,
    pub items: ItemService,
    pub clock_ins: ClockInService,
    pub started_at: Instant,
}

impl AppState {
    /// Wires the services onto the collections named in `config`.
    pub fn new(config: config::AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let items = ItemService::new(store.collection(&config.items_collection));
        let clock_ins = ClockInService::new(store.collection(&config.clock_in_collection));
        Self {
            config,
            store,
            items,
            clock_ins,
            started_at: Instant::now(),
        }
    }
}

impl ItemHandlerState for AppState {
    fn item_service(&self) -> &ItemService {
        &self.items
    }
}

impl ClockInHandlerState for AppState {
    fn clock_in_service(&self) -> &ClockInService {
        &self.clock_ins
    }
}

impl HealthHandlerState for AppState {
    fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Resource routes, without middleware.
///
/// The collection endpoints answer both with and without a trailing slash.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/items/", handlers::item_collection_route())
        .route("/clock-in/", handlers::clock_in_collection_route())
        .nest("/items", handlers::items_router())
        .nest("/clock-in", handlers::clock_in_router())
}

/// Builds the CORS layer from configuration.
///
/// Returns `None` when no origins are configured and permissive CORS is not
/// allowed for this environment.
pub fn cors_layer(cfg: &config::AppConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        Some(CorsLayer::permissive())
    } else {
        None
    }
}

/// Full application router: resources, health, docs and the middleware stack.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::<AppState>::new()
        .route("/", get(|| async { ROOT_BANNER }))
        .merge(health::health_routes())
        .merge(api_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
