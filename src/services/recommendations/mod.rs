//! Hybrid recommendation engine
//!
//! Blends collaborative filtering (what similar profiles interacted with)
//! and content-based filtering (how an item's genres, year and popularity
//! match a profile's stated preferences).
//!
//! The engine pulls a catalog from its [`CatalogStore`], builds an immutable
//! [`Snapshot`] (interaction matrix + feature table) and answers every query
//! from that snapshot. There is no incremental update: new interactions are
//! only seen after [`RecommendationEngine::refresh`].

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ScoredContent, SimilarProfile},
    services::catalog::CatalogStore,
};

pub mod features;
pub mod matrix;
pub mod scoring;
pub mod similarity;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_support;

pub use features::{ContentFeatureVector, FeatureTable};
pub use matrix::InteractionMatrix;
pub use snapshot::{Snapshot, SnapshotStats};

/// Lifecycle of the engine's derived state
enum EngineState {
    Uninitialized,
    Initializing,
    Ready(Arc<Snapshot>),
    /// Last build error, surfaced to readers until an explicit retry
    Failed(String),
}

impl EngineState {
    fn label(&self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Initializing => "initializing",
            EngineState::Ready(_) => "ready",
            EngineState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildMode {
    /// Implicit build on first read; a failed engine stays failed
    Lazy,
    /// Build unless already ready; retries after a failure
    Initialize,
    /// Always rebuild
    Refresh,
}

/// Externally visible engine status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub state: &'static str,
    pub store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SnapshotStats>,
    /// Error of the most recent failed build, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Recommendation engine bound to one catalog store
///
/// Builds are serialized: at most one snapshot build runs per engine, and
/// readers only ever see a fully built snapshot.
pub struct RecommendationEngine {
    store: Arc<dyn CatalogStore>,
    shared: RwLock<Shared>,
    build_lock: Mutex<()>,
}

/// State and last build error, always updated together
struct Shared {
    state: EngineState,
    last_error: Option<String>,
}

impl RecommendationEngine {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            shared: RwLock::new(Shared {
                state: EngineState::Uninitialized,
                last_error: None,
            }),
            build_lock: Mutex::new(()),
        }
    }

    /// Builds the snapshot unless one is already available
    ///
    /// Calling it on a ready engine is a no-op. After a failed build it
    /// retries.
    pub async fn initialize(&self) -> AppResult<Arc<Snapshot>> {
        self.build(BuildMode::Initialize).await
    }

    /// Rebuilds the snapshot from a fresh catalog load
    ///
    /// The previous snapshot keeps serving reads until the new one is
    /// published. If the rebuild fails the previous snapshot stays in place
    /// and the error is returned.
    pub async fn refresh(&self) -> AppResult<Arc<Snapshot>> {
        self.build(BuildMode::Refresh).await
    }

    /// Current snapshot, building it first if the engine was never initialized
    pub async fn snapshot(&self) -> AppResult<Arc<Snapshot>> {
        match &self.shared.read().await.state {
            EngineState::Ready(snapshot) => return Ok(snapshot.clone()),
            EngineState::Failed(message) => {
                return Err(AppError::ConfigurationFailure(message.clone()))
            }
            EngineState::Uninitialized | EngineState::Initializing => {}
        }

        self.build(BuildMode::Lazy).await
    }

    pub async fn status(&self) -> EngineStatus {
        let shared = self.shared.read().await;
        let snapshot = match &shared.state {
            EngineState::Ready(snapshot) => Some(snapshot),
            _ => None,
        };

        EngineStatus {
            state: shared.state.label(),
            store: self.store.name(),
            snapshot_id: snapshot.map(|s| s.id()),
            built_at: snapshot.map(|s| s.built_at()),
            stats: snapshot.map(|s| s.stats()),
            last_error: shared.last_error.clone(),
        }
    }

    pub async fn similar_users(&self, profile_id: &str) -> AppResult<Vec<SimilarProfile>> {
        self.snapshot().await?.similar_users(profile_id)
    }

    pub async fn collaborative_score(&self, profile_id: &str, content_id: &str) -> AppResult<f64> {
        self.snapshot()
            .await?
            .collaborative_score(profile_id, content_id)
    }

    pub async fn content_based_score(&self, profile_id: &str, content_id: &str) -> AppResult<f64> {
        self.snapshot()
            .await?
            .content_based_score(profile_id, content_id)
    }

    pub async fn personalized_recommendations(
        &self,
        profile_id: &str,
        count: usize,
    ) -> AppResult<Vec<ScoredContent>> {
        self.snapshot()
            .await?
            .personalized_recommendations(profile_id, count)
    }

    pub async fn similar_content(
        &self,
        content_id: &str,
        count: usize,
    ) -> AppResult<Vec<ScoredContent>> {
        self.snapshot().await?.similar_content(content_id, count)
    }

    pub async fn trending(&self, count: usize) -> AppResult<Vec<ScoredContent>> {
        Ok(self.snapshot().await?.trending(count))
    }

    pub async fn genre_content(&self, genre: &str, count: usize) -> AppResult<Vec<ScoredContent>> {
        Ok(self.snapshot().await?.genre_content(genre, count))
    }

    pub async fn content_features(&self, content_id: &str) -> AppResult<ContentFeatureVector> {
        self.snapshot()
            .await?
            .content_features(content_id)
            .cloned()
    }

    pub async fn watch_history(&self, profile_id: &str) -> AppResult<Vec<String>> {
        self.snapshot().await?.watch_history(profile_id)
    }

    async fn build(&self, mode: BuildMode) -> AppResult<Arc<Snapshot>> {
        let _guard = self.build_lock.lock().await;

        // Another caller may have finished a build while we waited
        let previous = {
            let mut shared = self.shared.write().await;
            let previous = match &shared.state {
                EngineState::Ready(snapshot) if mode != BuildMode::Refresh => {
                    return Ok(snapshot.clone())
                }
                EngineState::Failed(message) if mode == BuildMode::Lazy => {
                    return Err(AppError::ConfigurationFailure(message.clone()))
                }
                EngineState::Ready(snapshot) => Some(snapshot.clone()),
                _ => None,
            };

            // Readers keep the old snapshot during a refresh
            if previous.is_none() {
                shared.state = EngineState::Initializing;
            }
            previous
        };

        tracing::info!(
            store = self.store.name(),
            refresh = previous.is_some(),
            "Building recommendation snapshot"
        );

        let start = Instant::now();
        match self.load_and_build().await {
            Ok(snapshot) => {
                let stats = snapshot.stats();
                tracing::info!(
                    snapshot_id = %snapshot.id(),
                    content = stats.content_count,
                    profiles = stats.profile_count,
                    genres = stats.genre_count,
                    interactions = stats.interaction_count,
                    discarded = stats.discarded_interactions,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Recommendation snapshot ready"
                );

                let mut shared = self.shared.write().await;
                shared.state = EngineState::Ready(snapshot.clone());
                shared.last_error = None;
                Ok(snapshot)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(error = %message, store = self.store.name(), "Snapshot build failed");

                let mut shared = self.shared.write().await;
                shared.state = match previous {
                    Some(snapshot) => EngineState::Ready(snapshot),
                    None => EngineState::Failed(message.clone()),
                };
                shared.last_error = Some(message.clone());

                Err(AppError::ConfigurationFailure(message))
            }
        }
    }

    async fn load_and_build(&self) -> AppResult<Arc<Snapshot>> {
        let catalog = self.store.load_catalog().await?;

        let snapshot = tokio::task::spawn_blocking(move || Snapshot::build(catalog))
            .await
            .map_err(|e| AppError::Internal(format!("Snapshot build task failed: {}", e)))?;

        Ok(Arc::new(snapshot))
    }
}
