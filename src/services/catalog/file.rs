use std::path::PathBuf;

use crate::{
    error::AppResult,
    models::{CatalogDocument, ContentItem, Interaction, Profile},
    services::catalog::CatalogStore,
};

/// Catalog read from a JSON document on disk
///
/// The file is re-read on every load, so edits show up on the next refresh.
/// Shape: `{"content": [...], "profiles": [...], "interactions": [...]}`.
#[derive(Debug, Clone)]
pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_document(&self) -> AppResult<CatalogDocument> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to read catalog file");
            e
        })?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[async_trait::async_trait]
impl CatalogStore for FileCatalogStore {
    async fn load_content_catalog(&self) -> AppResult<Vec<ContentItem>> {
        Ok(self.read_document().await?.content)
    }

    async fn load_profile_catalog(&self) -> AppResult<Vec<Profile>> {
        Ok(self.read_document().await?.profiles)
    }

    async fn load_interaction_log(&self) -> AppResult<Vec<Interaction>> {
        Ok(self.read_document().await?.interactions)
    }

    async fn load_catalog(&self) -> AppResult<CatalogDocument> {
        self.read_document().await
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
