use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{
        rank_candidates, RecommendationCandidate, SocialDistances, UserId,
        SOCIAL_DISTANCE_FACTOR,
    },
    services::{strategies::RecommendationStrategy, strength::ConnectionStrengthCalculator},
};

const DISTANCE_WEIGHT: f64 = 0.7;
const FACTOR_WEIGHT: f64 = 0.3;

/// How the distance term enters the factor half of the score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceScoring {
    /// `0.7 * distanceScore + 0.3 * sum(connection factors)`
    #[default]
    Corrected,
    /// `0.7 * distanceScore + 0.3 * sum(connection factors + distanceScore)`
    ///
    /// Counts the distance term twice. Kept so rankings can be compared against the
    /// scores produced before the fix.
    Legacy,
}

/// Ranks candidates mostly by social distance, refined by connection strength
pub struct GraphDistanceStrategy {
    strength: Arc<ConnectionStrengthCalculator>,
    scoring: DistanceScoring,
}

impl GraphDistanceStrategy {
    pub const NAME: &'static str = "graph-distance";

    pub fn new(strength: Arc<ConnectionStrengthCalculator>, scoring: DistanceScoring) -> Self {
        Self { strength, scoring }
    }
}

/// `1 / (1 + distance)`: 1 for distance 0, decreasing towards 0
pub fn distance_score(distance: f64) -> f64 {
    1.0 / (1.0 + distance.max(0.0))
}

#[async_trait::async_trait]
impl RecommendationStrategy for GraphDistanceStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    #[instrument(skip(self, distances), fields(candidates = distances.len()))]
    async fn generate_recommendations(
        &self,
        user_id: UserId,
        distances: &SocialDistances,
    ) -> AppResult<Vec<RecommendationCandidate>> {
        let mut candidates = Vec::with_capacity(distances.len());

        for (&candidate_id, &distance) in distances {
            let distance_score = distance_score(distance);
            let mut factor_scores = self
                .strength
                .calculate_detailed_strength(user_id, candidate_id)
                .await?;
            let factor_sum: f64 = factor_scores.values().sum();

            factor_scores.insert(SOCIAL_DISTANCE_FACTOR.to_string(), distance_score);

            let factor_term = match self.scoring {
                DistanceScoring::Corrected => factor_sum,
                DistanceScoring::Legacy => factor_sum + distance_score,
            };
            let score = distance_score * DISTANCE_WEIGHT + factor_term * FACTOR_WEIGHT;

            candidates.push(RecommendationCandidate::new(
                candidate_id,
                score,
                factor_scores,
            ));
        }

        rank_candidates(&mut candidates);
        Ok(candidates)
    }
}
