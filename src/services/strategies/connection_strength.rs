use std::sync::Arc;

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{
        rank_candidates, RecommendationCandidate, SocialDistances, UserId,
        SOCIAL_DISTANCE_FACTOR,
    },
    services::{
        strategies::{graph_distance::distance_score, RecommendationStrategy},
        strength::{calculator::overall_from, ConnectionStrengthCalculator},
    },
};

/// Ranks reachable users by how much they already interact with the caller
///
/// Distance only decides who is a candidate; it does not affect the score. The
/// distance score is still reported in the breakdown.
pub struct ConnectionStrengthStrategy {
    strength: Arc<ConnectionStrengthCalculator>,
}

impl ConnectionStrengthStrategy {
    pub const NAME: &'static str = "connection-strength";

    pub fn new(strength: Arc<ConnectionStrengthCalculator>) -> Self {
        Self { strength }
    }
}

#[async_trait::async_trait]
impl RecommendationStrategy for ConnectionStrengthStrategy {
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
            let mut factor_scores = self
                .strength
                .calculate_detailed_strength(user_id, candidate_id)
                .await?;
            let score = overall_from(&factor_scores);
            factor_scores.insert(SOCIAL_DISTANCE_FACTOR.to_string(), distance_score(distance));

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
