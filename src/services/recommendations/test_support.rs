//! Fixtures shared by the engine's unit tests.

use crate::models::{CatalogDocument, ContentItem, ContentType, Interaction, Profile};

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Undated movie with default popularity
pub fn content(id: &str, genres: &[&str]) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        title: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        year: None,
        content_type: ContentType::Movie,
        popularity: 0.5,
        rating: None,
    }
}

pub fn dated(mut item: ContentItem, year: i32, popularity: f64) -> ContentItem {
    item.year = Some(year);
    item.popularity = popularity;
    item
}

pub fn profile(id: &str, genres: &[&str]) -> Profile {
    Profile::new(id, genres)
}

/// Two action movies, one profile that has seen the first
pub fn scenario_catalog() -> CatalogDocument {
    CatalogDocument {
        content: vec![
            dated(content("A", &["action"]), 2020, 0.8),
            dated(content("B", &["action"]), 2021, 0.6),
        ],
        profiles: vec![profile("p1", &["action"])],
        interactions: vec![Interaction::new("p1", "A", "view")],
    }
}
