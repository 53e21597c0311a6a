use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::UserId;

/// Candidate id → cumulative weighted path cost from the start user
///
/// Only meaningful for the traversal that produced it.
pub type SocialDistances = HashMap<UserId, f64>;

/// Factor name → contributed score for one user pair
pub type FactorScores = HashMap<String, f64>;

/// Key under which strategies record the distance-derived score
pub const SOCIAL_DISTANCE_FACTOR: &str = "socialDistance";

/// A scored friend suggestion returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCandidate {
    pub candidate_id: UserId,
    pub score: f64,
    pub factor_scores: FactorScores,
    pub generated_at: DateTime<Utc>,
}

impl RecommendationCandidate {
    pub fn new(candidate_id: UserId, score: f64, factor_scores: FactorScores) -> Self {
        Self {
            candidate_id,
            score,
            factor_scores,
            generated_at: Utc::now(),
        }
    }
}

/// Sorts by score descending; exact ties fall back to ascending user id
pub fn rank_candidates(candidates: &mut [RecommendationCandidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
}
