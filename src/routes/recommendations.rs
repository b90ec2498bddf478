use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    cached,
    db::CacheKey,
    error::AppResult,
    middleware::RequestId,
    models::{ScoredContent, SimilarProfile},
    routes::{AppState, CountQuery},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryResponse {
    pub profile_id: String,
    pub content_ids: Vec<String>,
}

/// Personalized recommendations for one profile
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(profile_id): Path<String>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<Vec<ScoredContent>>> {
    let count = state.resolve_count(query.count)?;
    let snapshot = state.engine.snapshot().await?;

    let key = CacheKey::Personalized {
        snapshot: snapshot.id(),
        profile_id: profile_id.clone(),
        count,
    };
    let ranked: Vec<ScoredContent> = cached!(state.cache.as_ref(), key, state.cache_ttl, async {
        snapshot.personalized_recommendations(&profile_id, count)
    })?;

    tracing::debug!(
        request_id = %request_id,
        profile_id = %profile_id,
        requested = count,
        returned = ranked.len(),
        "Served recommendations"
    );

    Ok(Json(ranked))
}

/// Profiles whose interaction rows point the same way as this one
pub async fn similar_profiles(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
) -> AppResult<Json<Vec<SimilarProfile>>> {
    let similar = state.engine.similar_users(&profile_id).await?;
    Ok(Json(similar))
}

/// Content the profile has a positive interaction weight for
pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
) -> AppResult<Json<WatchHistoryResponse>> {
    let content_ids = state.engine.watch_history(&profile_id).await?;
    Ok(Json(WatchHistoryResponse {
        profile_id,
        content_ids,
    }))
}
