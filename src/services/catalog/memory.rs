use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{CatalogDocument, ContentItem, Interaction, Profile},
    services::catalog::CatalogStore,
};

/// Catalog held in process memory
///
/// Appending an interaction only changes what the next snapshot build sees;
/// engines built earlier keep serving their old snapshot until refreshed.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    catalog: RwLock<CatalogDocument>,
}

impl InMemoryCatalogStore {
    pub fn new(catalog: CatalogDocument) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }

    pub async fn append_interaction(&self, interaction: Interaction) {
        self.catalog.write().await.interactions.push(interaction);
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn load_content_catalog(&self) -> AppResult<Vec<ContentItem>> {
        Ok(self.catalog.read().await.content.clone())
    }

    async fn load_profile_catalog(&self) -> AppResult<Vec<Profile>> {
        Ok(self.catalog.read().await.profiles.clone())
    }

    async fn load_interaction_log(&self) -> AppResult<Vec<Interaction>> {
        Ok(self.catalog.read().await.interactions.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_is_visible_to_next_load() {
        let store = InMemoryCatalogStore::new(CatalogDocument {
            content: vec![serde_json::from_str(r#"{"id": "A"}"#).unwrap()],
            profiles: vec![Profile::new("p1", &["drama"])],
            interactions: vec![],
        });

        assert!(store.load_catalog().await.unwrap().interactions.is_empty());

        store
            .append_interaction(Interaction::new("p1", "A", "like"))
            .await;

        let catalog = store.load_catalog().await.unwrap();
        assert_eq!(catalog.interactions.len(), 1);
        assert_eq!(catalog.content.len(), 1);
        assert_eq!(catalog.profiles[0].id, "p1");
    }
}
