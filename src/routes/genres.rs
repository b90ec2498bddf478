use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    cached,
    db::CacheKey,
    error::AppResult,
    models::ScoredContent,
    routes::{AppState, CountQuery},
};

/// Content tagged with a genre, most popular first
///
/// Genre matching ignores case. An unknown genre yields an empty list.
pub async fn content(
    State(state): State<Arc<AppState>>,
    Path(genre): Path<String>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<Vec<ScoredContent>>> {
    let count = state.resolve_count(query.count)?;
    let snapshot = state.engine.snapshot().await?;

    let key = CacheKey::Genre {
        snapshot: snapshot.id(),
        genre: genre.clone(),
        count,
    };
    let ranked: Vec<ScoredContent> = cached!(state.cache.as_ref(), key, state.cache_ttl, async {
        AppResult::Ok(snapshot.genre_content(&genre, count))
    })?;

    Ok(Json(ranked))
}
