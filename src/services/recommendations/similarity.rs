//! Profile-to-profile similarity over the interaction matrix.

use std::cmp::Ordering;

use super::matrix::InteractionMatrix;
use crate::models::SimilarProfile;

/// Cosine similarity of two index-aligned weight vectors
///
/// Returns 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    // sqrt(|a|²·|b|²) keeps identical vectors at exactly 1.0
    let magnitude = (norm_a * norm_b).sqrt();
    if magnitude > 0.0 {
        (dot / magnitude).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Profiles with a positive similarity to `profile_id`, most similar first
///
/// Ties are broken by ascending profile id. Returns `None` if the profile
/// has no row in the matrix.
pub fn similar_users(matrix: &InteractionMatrix, profile_id: &str) -> Option<Vec<SimilarProfile>> {
    let target = matrix.row(profile_id)?;

    let mut neighbours: Vec<SimilarProfile> = matrix
        .rows()
        .filter(|(other_id, _)| *other_id != profile_id)
        .filter_map(|(other_id, row)| {
            let similarity = cosine_similarity(target, row);
            (similarity > 0.0).then(|| SimilarProfile {
                profile_id: other_id.to_string(),
                similarity,
            })
        })
        .collect();

    neighbours.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });

    Some(neighbours)
}
