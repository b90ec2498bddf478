use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    cached,
    db::CacheKey,
    error::AppResult,
    middleware::RequestId,
    models::ScoredContent,
    routes::{AppState, CountQuery},
    services::recommendations::ContentFeatureVector,
};

/// Most popular content across the catalog
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<Vec<ScoredContent>>> {
    let count = state.resolve_count(query.count)?;
    let snapshot = state.engine.snapshot().await?;

    let key = CacheKey::Trending {
        snapshot: snapshot.id(),
        count,
    };
    let ranked: Vec<ScoredContent> = cached!(state.cache.as_ref(), key, state.cache_ttl, async {
        AppResult::Ok(snapshot.trending(count))
    })?;

    Ok(Json(ranked))
}

/// Items most similar to the given one by genre, year and type
pub async fn similar(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(content_id): Path<String>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<Vec<ScoredContent>>> {
    let count = state.resolve_count(query.count)?;
    let snapshot = state.engine.snapshot().await?;

    let key = CacheKey::SimilarContent {
        snapshot: snapshot.id(),
        content_id: content_id.clone(),
        count,
    };
    let ranked: Vec<ScoredContent> = cached!(state.cache.as_ref(), key, state.cache_ttl, async {
        snapshot.similar_content(&content_id, count)
    })?;

    tracing::debug!(
        request_id = %request_id,
        content_id = %content_id,
        returned = ranked.len(),
        "Served similar content"
    );

    Ok(Json(ranked))
}

/// Normalized feature vector the engine derived for an item
pub async fn features(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<String>,
) -> AppResult<Json<ContentFeatureVector>> {
    let features = state.engine.content_features(&content_id).await?;
    Ok(Json(features))
}
