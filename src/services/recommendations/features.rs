//! Content feature extraction.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ContentItem, ContentType};

const YEAR_ORIGIN: f64 = 1950.0;
const YEAR_SPAN: f64 = 75.0;
const NEUTRAL: f64 = 0.5;

/// Normalized attributes of one content item
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContentFeatureVector {
    /// Membership (0 or 1) for every genre of the snapshot's genre universe
    pub genres: BTreeMap<String, u8>,
    /// Release year mapped from 1950..2025 onto [0, 1]
    pub year: f64,
    /// 0 for movies, 1 for series
    #[serde(rename = "type")]
    pub content_type: f64,
    pub popularity: f64,
    /// Rating scaled to [0, 1]
    pub rating: f64,
}

impl ContentFeatureVector {
    /// Flat form: genres in universe order, then year, type, popularity, rating
    pub fn to_dense(&self) -> Vec<f64> {
        self.genres
            .values()
            .map(|&member| f64::from(member))
            .chain([self.year, self.content_type, self.popularity, self.rating])
            .collect()
    }
}

/// Feature vectors of a whole catalog, keyed by content id
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureTable {
    genre_universe: BTreeSet<String>,
    vectors: BTreeMap<String, ContentFeatureVector>,
}

impl FeatureTable {
    pub fn build(contents: &[ContentItem]) -> Self {
        let genre_universe: BTreeSet<String> = contents
            .iter()
            .flat_map(|item| item.genres.iter().cloned())
            .collect();

        let mut vectors = BTreeMap::new();
        for item in contents {
            vectors
                .entry(item.id.clone())
                .or_insert_with(|| extract(item, &genre_universe));
        }

        Self {
            genre_universe,
            vectors,
        }
    }

    pub fn get(&self, content_id: &str) -> Option<&ContentFeatureVector> {
        self.vectors.get(content_id)
    }

    pub fn genre_universe(&self) -> &BTreeSet<String> {
        &self.genre_universe
    }
}

fn extract(item: &ContentItem, universe: &BTreeSet<String>) -> ContentFeatureVector {
    let genres = universe
        .iter()
        .map(|genre| (genre.clone(), u8::from(item.has_genre(genre))))
        .collect();

    ContentFeatureVector {
        genres,
        year: item
            .year
            .map(|year| ((f64::from(year) - YEAR_ORIGIN) / YEAR_SPAN).clamp(0.0, 1.0))
            .unwrap_or(NEUTRAL),
        content_type: match item.content_type {
            ContentType::Movie => 0.0,
            ContentType::Series => 1.0,
        },
        popularity: item.popularity,
        rating: item.rating.map(|r| r / 10.0).unwrap_or(NEUTRAL),
    }
}
