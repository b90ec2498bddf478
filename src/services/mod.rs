pub mod catalog;
pub mod recommendations;

pub use catalog::CatalogStore;
pub use recommendations::RecommendationEngine;
