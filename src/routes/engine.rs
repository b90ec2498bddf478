use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    routes::AppState,
    services::recommendations::EngineStatus,
};

/// Engine state plus the current snapshot's id and sizes
pub async fn status(State(state): State<Arc<AppState>>) -> Json<EngineStatus> {
    Json(state.engine.status().await)
}

/// Rebuilds the snapshot from the catalog store
///
/// On failure the previous snapshot keeps serving and the error is returned.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<EngineStatus>> {
    tracing::info!(request_id = %request_id, "Snapshot refresh requested");

    state.engine.refresh().await?;
    Ok(Json(state.engine.status().await))
}
