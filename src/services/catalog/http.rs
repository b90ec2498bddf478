/// Catalog store backed by a remote document service
///
/// Each collection is exposed as a JSON array:
/// `GET {base}/content`, `GET {base}/profiles`, `GET {base}/interactions`.
use crate::{
    error::{AppError, AppResult},
    models::{ContentItem, Interaction, Profile},
    services::catalog::CatalogStore,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct HttpCatalogStore {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
}

impl HttpCatalogStore {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.api_url, collection)
    }

    async fn fetch_collection<T: DeserializeOwned>(&self, collection: &str) -> AppResult<Vec<T>> {
        let url = self.collection_url(collection);

        let mut request = self.http_client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Catalog service returned status {} for {}: {}",
                status, collection, body
            )));
        }

        let documents: Vec<T> = response.json().await?;

        tracing::debug!(
            collection,
            documents = documents.len(),
            "Fetched catalog collection"
        );

        Ok(documents)
    }
}

#[async_trait::async_trait]
impl CatalogStore for HttpCatalogStore {
    async fn load_content_catalog(&self) -> AppResult<Vec<ContentItem>> {
        self.fetch_collection("content").await
    }

    async fn load_profile_catalog(&self) -> AppResult<Vec<Profile>> {
        self.fetch_collection("profiles").await
    }

    async fn load_interaction_log(&self) -> AppResult<Vec<Interaction>> {
        self.fetch_collection("interactions").await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_strips_trailing_slash() {
        let store = HttpCatalogStore::new("http://catalog.local/v1/".to_string(), None);
        assert_eq!(
            store.collection_url("profiles"),
            "http://catalog.local/v1/profiles"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        // Port 9 (discard) on loopback refuses connections
        let store = HttpCatalogStore::new("http://127.0.0.1:9".to_string(), None);

        let err = store.load_content_catalog().await.unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
    }
}
