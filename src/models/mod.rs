use serde::{Deserialize, Serialize};

mod content;
mod interaction;
mod profile;

pub use content::{ContentItem, ContentType, DEFAULT_POPULARITY};
pub use interaction::{Interaction, InteractionKind};
pub use profile::{Profile, ProfilePreferences};

/// A content item together with the score it was ranked by
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredContent {
    #[serde(flatten)]
    pub item: ContentItem,
    pub score: f64,
}

/// Another profile and its cosine similarity to the queried one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarProfile {
    pub profile_id: String,
    pub similarity: f64,
}

/// Everything the catalog store hands over for one snapshot build
///
/// Also the on-disk shape of the JSON catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogDocument {
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scored_content_is_flattened() {
        let scored = ScoredContent {
            item: ContentItem {
                id: "B".to_string(),
                title: None,
                genres: vec!["action".to_string()],
                year: Some(2021),
                content_type: ContentType::Movie,
                popularity: 0.6,
                rating: None,
            },
            score: 0.25,
        };

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["id"], "B");
        assert_eq!(json["type"], "movie");
        assert_eq!(json["score"], 0.25);

        let back: ScoredContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, scored);
    }

    #[test]
    fn test_catalog_document_sections_are_optional() {
        let doc: CatalogDocument =
            serde_json::from_str(r#"{"content": [{"id": "A"}]}"#).unwrap();
        assert_eq!(doc.content.len(), 1);
        assert!(doc.profiles.is_empty());
        assert!(doc.interactions.is_empty());
    }
}
