//! Collaborative, content-based and item-to-item scoring functions.
//!
//! All weights are fixed design constants.

use std::collections::HashSet;

use super::matrix::InteractionMatrix;
use crate::models::{ContentItem, Profile, SimilarProfile};

const GENRE_WEIGHT: f64 = 0.6;
const RECENCY_WEIGHT: f64 = 0.1;
const POPULARITY_WEIGHT: f64 = 0.3;

const RECENCY_ORIGIN: f64 = 2000.0;
const RECENCY_SPAN: f64 = 25.0;

const SIMILAR_GENRE_WEIGHT: f64 = 0.6;
const SIMILAR_YEAR_WEIGHT: f64 = 0.3;
const SIMILAR_TYPE_WEIGHT: f64 = 0.1;
const YEAR_DISTANCE_SPAN: f64 = 50.0;
const UNKNOWN_YEAR_DISTANCE: f64 = 0.5;

/// Share of the hybrid score taken by the collaborative signal
pub const COLLABORATIVE_SHARE: f64 = 0.7;
/// Share of the hybrid score taken by the content-based signal
pub const CONTENT_SHARE: f64 = 0.3;

/// Similarity-weighted average of the neighbours' weights for one item
///
/// 0 when there are no positively similar neighbours.
pub fn collaborative_score(
    matrix: &InteractionMatrix,
    neighbours: &[SimilarProfile],
    content_id: &str,
) -> f64 {
    let mut weighted = 0.0;
    let mut total_similarity = 0.0;

    for neighbour in neighbours {
        let weight = matrix
            .weight(&neighbour.profile_id, content_id)
            .unwrap_or(0.0);
        weighted += weight * neighbour.similarity;
        total_similarity += neighbour.similarity;
    }

    if total_similarity > 0.0 {
        weighted / total_similarity
    } else {
        0.0
    }
}

/// How well an item matches a profile's stated genres, nudged by recency
/// and popularity
pub fn content_based_score(profile: &Profile, content: &ContentItem) -> f64 {
    let genre_score = if content.genres.is_empty() {
        0.0
    } else {
        let matches = content
            .genres
            .iter()
            .filter(|genre| profile.prefers(genre))
            .count();
        matches as f64 / content.genres.len() as f64
    };

    let year_score = content
        .year
        .map(|year| ((f64::from(year) - RECENCY_ORIGIN) / RECENCY_SPAN).clamp(0.0, 1.0))
        .unwrap_or(0.5);

    GENRE_WEIGHT * genre_score + RECENCY_WEIGHT * year_score + POPULARITY_WEIGHT * content.popularity
}

pub fn hybrid_score(collaborative: f64, content_based: f64) -> f64 {
    COLLABORATIVE_SHARE * collaborative + CONTENT_SHARE * content_based
}

/// Item-to-item similarity from genres, release year and type
pub fn content_similarity(a: &ContentItem, b: &ContentItem) -> f64 {
    let genres_a: HashSet<&str> = a.genres.iter().map(String::as_str).collect();
    let genres_b: HashSet<&str> = b.genres.iter().map(String::as_str).collect();

    let union = genres_a.union(&genres_b).count();
    let genre_jaccard = if union > 0 {
        genres_a.intersection(&genres_b).count() as f64 / union as f64
    } else {
        0.0
    };

    let year_distance = match (a.year, b.year) {
        (Some(x), Some(y)) => (f64::from(x) - f64::from(y)).abs() / YEAR_DISTANCE_SPAN,
        _ => UNKNOWN_YEAR_DISTANCE,
    };
    let year_similarity = 1.0 - year_distance.min(1.0);

    let type_match = if a.content_type == b.content_type {
        1.0
    } else {
        0.0
    };

    // Summed smallest weight first: a perfect match must come out at exactly 1.0
    SIMILAR_TYPE_WEIGHT * type_match
        + SIMILAR_YEAR_WEIGHT * year_similarity
        + SIMILAR_GENRE_WEIGHT * genre_jaccard
}
