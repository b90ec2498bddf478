use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Cache,
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::recommendations::RecommendationEngine,
};

pub mod content;
pub mod engine;
pub mod genres;
pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    /// Result cache; `None` when no Redis URL is configured
    pub cache: Option<Cache>,
    pub cache_ttl: u64,
    pub default_count: usize,
    pub max_count: usize,
}

impl AppState {
    pub fn new(engine: Arc<RecommendationEngine>, default_count: usize, max_count: usize) -> Self {
        Self {
            engine,
            cache: None,
            cache_ttl: 0,
            default_count,
            max_count,
        }
    }

    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    /// Validates an optional `count` query parameter
    ///
    /// A missing count falls back to the configured default. Zero and values
    /// above the configured maximum are rejected.
    pub fn resolve_count(&self, requested: Option<usize>) -> AppResult<usize> {
        match requested {
            None => Ok(self.default_count),
            Some(0) => Err(AppError::InvalidInput(
                "count must be at least 1".to_string(),
            )),
            Some(count) if count > self.max_count => Err(AppError::InvalidInput(format!(
                "count must not exceed {}",
                self.max_count
            ))),
            Some(count) => Ok(count),
        }
    }
}

/// `?count=` query shared by the ranked listing endpoints
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub count: Option<usize>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/engine", get(engine::status))
        .route("/engine/refresh", post(engine::refresh))
        .route(
            "/profiles/:profile_id/recommendations",
            get(recommendations::recommend),
        )
        .route(
            "/profiles/:profile_id/similar",
            get(recommendations::similar_profiles),
        )
        .route(
            "/profiles/:profile_id/history",
            get(recommendations::history),
        )
        .route("/content/trending", get(content::trending))
        .route("/content/:content_id/similar", get(content::similar))
        .route("/content/:content_id/features", get(content::features))
        .route("/genres/:genre/content", get(genres::content))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
