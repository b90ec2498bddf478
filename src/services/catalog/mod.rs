/// Catalog store abstraction
///
/// The engine never owns persistence: it pulls read-only snapshots of the
/// content catalog, the profile catalog and the interaction log from a
/// pluggable store (PostgreSQL, an HTTP document service, a JSON file, or
/// memory).
use crate::{
    error::AppResult,
    models::{CatalogDocument, ContentItem, Interaction, Profile},
};

pub mod file;
pub mod http;
pub mod memory;
pub mod postgres;

pub use file::FileCatalogStore;
pub use http::HttpCatalogStore;
pub use memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;

/// Source of catalog snapshots
///
/// Each call returns the full current state of one collection. The order of
/// the returned lists is the catalog order used for ranking tie-breaks, so
/// implementations should return a stable order.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load_content_catalog(&self) -> AppResult<Vec<ContentItem>>;

    async fn load_profile_catalog(&self) -> AppResult<Vec<Profile>>;

    async fn load_interaction_log(&self) -> AppResult<Vec<Interaction>>;

    /// All three collections as one document
    ///
    /// The default fetches the collections concurrently. Stores that can
    /// read everything at once should override it to get a consistent view.
    async fn load_catalog(&self) -> AppResult<CatalogDocument> {
        let (content, profiles, interactions) = tokio::try_join!(
            self.load_content_catalog(),
            self.load_profile_catalog(),
            self.load_interaction_log(),
        )?;

        Ok(CatalogDocument {
            content,
            profiles,
            interactions,
        })
    }

    /// Store name for logging
    fn name(&self) -> &'static str;
}
