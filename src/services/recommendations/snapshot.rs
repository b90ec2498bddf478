use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

use super::features::{ContentFeatureVector, FeatureTable};
use super::matrix::InteractionMatrix;
use super::{scoring, similarity};
use crate::{
    error::{AppError, AppResult},
    models::{CatalogDocument, ContentItem, Profile, ScoredContent, SimilarProfile},
};

/// Rating assumed when ranking items that have none
const NEUTRAL_RATING: f64 = 5.0;

/// Size figures of one built snapshot
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStats {
    pub content_count: usize,
    pub profile_count: usize,
    pub genre_count: usize,
    pub interaction_count: usize,
    pub discarded_interactions: usize,
}

/// Immutable result of one engine build
///
/// Every ranking query is answered from a snapshot; nothing in it changes
/// after [`Snapshot::build`] returns.
#[derive(Debug)]
pub struct Snapshot {
    id: Uuid,
    built_at: DateTime<Utc>,
    contents: Vec<ContentItem>,
    content_index: HashMap<String, usize>,
    profiles: Vec<Profile>,
    profile_index: HashMap<String, usize>,
    matrix: InteractionMatrix,
    features: FeatureTable,
    interaction_count: usize,
}

impl Snapshot {
    pub fn build(catalog: CatalogDocument) -> Self {
        let CatalogDocument {
            content,
            profiles,
            interactions,
        } = catalog;

        let contents = dedup_by_id(content, |c| &c.id, "content");
        let profiles = dedup_by_id(profiles, |p| &p.id, "profile");

        let matrix = InteractionMatrix::build(&profiles, &contents, &interactions);
        let features = FeatureTable::build(&contents);

        Self {
            id: Uuid::new_v4(),
            built_at: Utc::now(),
            content_index: positions(&contents, |c| &c.id),
            profile_index: positions(&profiles, |p| &p.id),
            contents,
            profiles,
            matrix,
            features,
            interaction_count: interactions.len(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            content_count: self.contents.len(),
            profile_count: self.profiles.len(),
            genre_count: self.features.genre_universe().len(),
            interaction_count: self.interaction_count,
            discarded_interactions: self.matrix.discarded(),
        }
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn profile(&self, profile_id: &str) -> AppResult<&Profile> {
        self.profile_index
            .get(profile_id)
            .map(|&idx| &self.profiles[idx])
            .ok_or_else(|| AppError::ProfileNotFound(profile_id.to_string()))
    }

    pub fn content(&self, content_id: &str) -> AppResult<&ContentItem> {
        self.content_index
            .get(content_id)
            .map(|&idx| &self.contents[idx])
            .ok_or_else(|| AppError::ContentNotFound(content_id.to_string()))
    }

    pub fn similar_users(&self, profile_id: &str) -> AppResult<Vec<SimilarProfile>> {
        similarity::similar_users(&self.matrix, profile_id)
            .ok_or_else(|| AppError::ProfileNotFound(profile_id.to_string()))
    }

    pub fn collaborative_score(&self, profile_id: &str, content_id: &str) -> AppResult<f64> {
        self.content(content_id)?;
        let neighbours = self.similar_users(profile_id)?;
        Ok(scoring::collaborative_score(
            &self.matrix,
            &neighbours,
            content_id,
        ))
    }

    pub fn content_based_score(&self, profile_id: &str, content_id: &str) -> AppResult<f64> {
        let profile = self.profile(profile_id)?;
        let content = self.content(content_id)?;
        Ok(scoring::content_based_score(profile, content))
    }

    /// Content ids the profile has a positive accumulated weight for
    pub fn watch_history(&self, profile_id: &str) -> AppResult<Vec<String>> {
        self.matrix
            .watched(profile_id)
            .map(|ids| ids.into_iter().map(str::to_string).collect())
            .ok_or_else(|| AppError::ProfileNotFound(profile_id.to_string()))
    }

    /// Unwatched items ranked by the hybrid collaborative/content score
    pub fn personalized_recommendations(
        &self,
        profile_id: &str,
        count: usize,
    ) -> AppResult<Vec<ScoredContent>> {
        let profile = self.profile(profile_id)?;
        let row = self
            .matrix
            .row(profile_id)
            .ok_or_else(|| AppError::ProfileNotFound(profile_id.to_string()))?;
        let neighbours = self.similar_users(profile_id)?;

        let candidates = self
            .contents
            .iter()
            .zip(row)
            .filter(|(_, &weight)| weight <= 0.0)
            .map(|(item, _)| {
                let collaborative = scoring::collaborative_score(&self.matrix, &neighbours, &item.id);
                let content_based = scoring::content_based_score(profile, item);
                (item, scoring::hybrid_score(collaborative, content_based))
            });

        let ranked = top_n(candidates, count);

        tracing::debug!(
            profile_id = %profile_id,
            neighbours = neighbours.len(),
            returned = ranked.len(),
            "Ranked personalized recommendations"
        );

        Ok(ranked)
    }

    /// Items most similar to `content_id` by genres, year and type
    pub fn similar_content(&self, content_id: &str, count: usize) -> AppResult<Vec<ScoredContent>> {
        let base = self.content(content_id)?;

        let candidates = self
            .contents
            .iter()
            .filter(|item| item.id != base.id)
            .map(|item| (item, scoring::content_similarity(base, item)));

        Ok(top_n(candidates, count))
    }

    /// Most popular items, scored by popularity
    pub fn trending(&self, count: usize) -> Vec<ScoredContent> {
        self.rank_by_popularity(self.contents.iter(), count)
    }

    /// Most popular items carrying `genre` (ASCII case-insensitive)
    pub fn genre_content(&self, genre: &str, count: usize) -> Vec<ScoredContent> {
        let matching = self
            .contents
            .iter()
            .filter(|item| item.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)));
        self.rank_by_popularity(matching, count)
    }

    pub fn content_features(&self, content_id: &str) -> AppResult<&ContentFeatureVector> {
        self.features
            .get(content_id)
            .ok_or_else(|| AppError::ContentNotFound(content_id.to_string()))
    }

    fn rank_by_popularity<'a>(
        &self,
        items: impl Iterator<Item = &'a ContentItem>,
        count: usize,
    ) -> Vec<ScoredContent> {
        let mut ranked: Vec<&ContentItem> = items.collect();
        ranked.sort_by(|a, b| {
            descending(a.popularity, b.popularity).then_with(|| {
                descending(
                    a.rating.unwrap_or(NEUTRAL_RATING),
                    b.rating.unwrap_or(NEUTRAL_RATING),
                )
            })
        });

        ranked
            .into_iter()
            .take(count)
            .map(|item| ScoredContent {
                item: item.clone(),
                score: item.popularity,
            })
            .collect()
    }
}

/// Highest scores first; equal scores keep their input order
fn top_n<'a>(
    scored: impl Iterator<Item = (&'a ContentItem, f64)>,
    count: usize,
) -> Vec<ScoredContent> {
    let mut scored: Vec<(&ContentItem, f64)> = scored.collect();
    // sort_by is stable, which gives the catalog-order tie-break
    scored.sort_by(|a, b| descending(a.1, b.1));

    scored
        .into_iter()
        .take(count)
        .map(|(item, score)| ScoredContent {
            item: item.clone(),
            score,
        })
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn positions<T>(items: &[T], id: impl Fn(&T) -> &String) -> HashMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| (id(item).clone(), idx))
        .collect()
}

fn dedup_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> &String, kind: &str) -> Vec<T> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    let total = items.len();

    let unique: Vec<T> = items
        .into_iter()
        .filter(|item| seen.insert(id(item).clone()))
        .collect();

    if unique.len() < total {
        tracing::warn!(
            kind,
            duplicates = total - unique.len(),
            "Catalog contains duplicate ids, keeping first occurrence"
        );
    }

    unique
}
