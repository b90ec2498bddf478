use serde::{Deserialize, Serialize};

/// Popularity assumed for items that don't carry one
pub const DEFAULT_POPULARITY: f64 = 0.5;

/// Kind of content item
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Movie,
    Series,
}

/// A movie or series from the content catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
    /// Expected in [0, 1]
    #[serde(default = "default_popularity")]
    pub popularity: f64,
    /// Average rating on a 0-10 scale
    #[serde(default)]
    pub rating: Option<f64>,
}

fn default_popularity() -> f64 {
    DEFAULT_POPULARITY
}

impl ContentItem {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}
