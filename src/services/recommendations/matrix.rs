//! Dense profile × content interaction matrix.

use std::collections::{BTreeMap, HashMap};

use crate::models::{ContentItem, Interaction, Profile};

/// Accumulated interaction weights for every (profile, content) pair
///
/// Rows follow profile catalog order and columns follow content catalog
/// order. Every cell exists; a pair nobody interacted with holds 0.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix {
    profile_ids: Vec<String>,
    content_ids: Vec<String>,
    profile_index: HashMap<String, usize>,
    content_index: HashMap<String, usize>,
    rows: Vec<Vec<f64>>,
    applied: usize,
    discarded: usize,
}

impl InteractionMatrix {
    /// Builds the matrix from a full interaction log
    ///
    /// Interactions pointing at an unknown profile or content item are
    /// dropped and counted in [`InteractionMatrix::discarded`].
    pub fn build(
        profiles: &[Profile],
        contents: &[ContentItem],
        interactions: &[Interaction],
    ) -> Self {
        let profile_ids: Vec<String> = profiles.iter().map(|p| p.id.clone()).collect();
        let content_ids: Vec<String> = contents.iter().map(|c| c.id.clone()).collect();
        let profile_index = index_of(&profile_ids);
        let content_index = index_of(&content_ids);

        let mut rows = vec![vec![0.0; content_ids.len()]; profile_ids.len()];
        let mut applied = 0;
        let mut discarded = 0;

        for interaction in interactions {
            let cell = profile_index
                .get(&interaction.profile_id)
                .zip(content_index.get(&interaction.content_id));

            match cell {
                Some((&row, &col)) => {
                    rows[row][col] += interaction.kind.weight();
                    applied += 1;
                }
                None => {
                    tracing::debug!(
                        profile_id = %interaction.profile_id,
                        content_id = %interaction.content_id,
                        "Dropping interaction with unknown reference"
                    );
                    discarded += 1;
                }
            }
        }

        Self {
            profile_ids,
            content_ids,
            profile_index,
            content_index,
            rows,
            applied,
            discarded,
        }
    }

    /// Weight row of a profile, aligned with [`InteractionMatrix::content_ids`]
    pub fn row(&self, profile_id: &str) -> Option<&[f64]> {
        self.profile_index
            .get(profile_id)
            .map(|&idx| self.rows[idx].as_slice())
    }

    pub fn weight(&self, profile_id: &str, content_id: &str) -> Option<f64> {
        let row = self.row(profile_id)?;
        self.content_index.get(content_id).map(|&col| row[col])
    }

    pub fn profile_ids(&self) -> &[String] {
        &self.profile_ids
    }

    pub fn content_ids(&self) -> &[String] {
        &self.content_ids
    }

    /// Rows of every profile paired with its id, in catalog order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.profile_ids
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    /// Content ids the profile has a strictly positive weight for
    pub fn watched(&self, profile_id: &str) -> Option<Vec<&str>> {
        let row = self.row(profile_id)?;
        Some(
            self.content_ids
                .iter()
                .zip(row)
                .filter(|(_, &w)| w > 0.0)
                .map(|(id, _)| id.as_str())
                .collect(),
        )
    }

    /// Interactions that landed in a cell
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Interactions dropped for referencing unknown ids
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Nested-map view: profile id → content id → weight
    pub fn to_nested(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        self.rows()
            .map(|(profile_id, row)| {
                let cells = self
                    .content_ids
                    .iter()
                    .cloned()
                    .zip(row.iter().copied())
                    .collect();
                (profile_id.to_string(), cells)
            })
            .collect()
    }
}

// First occurrence wins for duplicated ids
fn index_of(ids: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        index.entry(id.clone()).or_insert(i);
    }
    index
}
