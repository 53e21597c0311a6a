use tracing::instrument;

use crate::{
    error::AppResult,
    models::{FactorScores, UserId},
    services::strength::FactorRegistry,
};

/// Lower bound of the overall connection strength
///
/// Keeps graph edge weights strictly below 1 even for pairs with no interactions.
pub const MIN_CONNECTION_STRENGTH: f64 = 0.1;

/// Runs every registered factor for a user pair
pub struct ConnectionStrengthCalculator {
    registry: FactorRegistry,
}

impl ConnectionStrengthCalculator {
    pub fn new(registry: FactorRegistry) -> Self {
        Self { registry }
    }

    /// Per-factor contributions, each clamped to `[0, weight]`
    #[instrument(skip(self), level = "debug")]
    pub async fn calculate_detailed_strength(&self, a: UserId, b: UserId) -> AppResult<FactorScores> {
        let mut scores = FactorScores::with_capacity(self.registry.len());

        for factor in self.registry.iter() {
            let score = factor.calculate_strength(a, b).await?;
            let bounded = if score.is_finite() {
                score.clamp(0.0, factor.weight())
            } else {
                tracing::warn!(factor = factor.name(), score, "Non-finite factor score");
                0.0
            };
            scores.insert(factor.name().to_string(), bounded);
        }

        Ok(scores)
    }

    /// Sum of all factor contributions, never below [`MIN_CONNECTION_STRENGTH`]
    pub async fn calculate_overall_strength(&self, a: UserId, b: UserId) -> AppResult<f64> {
        let scores = self.calculate_detailed_strength(a, b).await?;
        Ok(overall_from(&scores))
    }
}

/// Folds a factor breakdown into the floored overall strength
pub fn overall_from(scores: &FactorScores) -> f64 {
    scores.values().sum::<f64>().max(MIN_CONNECTION_STRENGTH)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockInteractionCountProvider;
    use crate::services::strength::{default_factors, test_support::fixed};

    fn calculator_with_counts(mutual: u64, likes: u64, comments: u64) -> ConnectionStrengthCalculator {
        let mut counts = MockInteractionCountProvider::new();
        counts
            .expect_count_mutual_friends()
            .returning(move |a, b| Ok(if a == b { 0 } else { mutual }));
        counts
            .expect_count_common_post_likes()
            .returning(move |a, b| Ok(if a == b { 0 } else { likes }));
        counts
            .expect_count_common_comment_likes()
            .returning(move |a, b| Ok(if a == b { 0 } else { comments }));

        let registry = FactorRegistry::new(default_factors(Arc::new(counts))).unwrap();
        ConnectionStrengthCalculator::new(registry)
    }

    #[tokio::test]
    async fn test_detailed_strength_reports_every_factor() {
        let calculator = calculator_with_counts(5, 10, 0);

        let scores = calculator
            .calculate_detailed_strength(UserId(1), UserId(2))
            .await
            .unwrap();

        assert_eq!(scores.len(), 3);
        assert!((scores["mutualFriends"] - 0.2).abs() < 1e-12);
        assert_eq!(scores["commonLikes"], 0.25);
        assert_eq!(scores["commonComments"], 0.0);
    }

    #[tokio::test]
    async fn test_overall_strength_sums_contributions() {
        let calculator = calculator_with_counts(5, 10, 5);

        let overall = calculator
            .calculate_overall_strength(UserId(1), UserId(2))
            .await
            .unwrap();

        assert!((overall - 0.65).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_overall_strength_floor_for_strangers() {
        let calculator = calculator_with_counts(0, 0, 0);

        let overall = calculator
            .calculate_overall_strength(UserId(1), UserId(2))
            .await
            .unwrap();

        assert_eq!(overall, MIN_CONNECTION_STRENGTH);
    }

    #[tokio::test]
    async fn test_overall_strength_of_user_with_self_is_floor() {
        let calculator = calculator_with_counts(8, 8, 8);

        let overall = calculator
            .calculate_overall_strength(UserId(3), UserId(3))
            .await
            .unwrap();

        assert_eq!(overall, MIN_CONNECTION_STRENGTH);
    }

    #[tokio::test]
    async fn test_overall_strength_never_below_floor() {
        let calculator = calculator_with_counts(1, 0, 0);

        for other in 2..20 {
            let overall = calculator
                .calculate_overall_strength(UserId(1), UserId(other))
                .await
                .unwrap();
            assert!(overall >= MIN_CONNECTION_STRENGTH);
        }
    }

    #[tokio::test]
    async fn test_contribution_clamped_to_weight() {
        let registry = FactorRegistry::new(vec![
            fixed("overshoot", 0.3, 0.9),
            fixed("negative", 0.3, -0.5),
        ])
        .unwrap();
        let calculator = ConnectionStrengthCalculator::new(registry);

        let scores = calculator
            .calculate_detailed_strength(UserId(1), UserId(2))
            .await
            .unwrap();

        assert_eq!(scores["overshoot"], 0.3);
        assert_eq!(scores["negative"], 0.0);
    }

    #[tokio::test]
    async fn test_factor_failure_propagates() {
        let mut counts = MockInteractionCountProvider::new();
        counts
            .expect_count_mutual_friends()
            .returning(|_, _| Err(AppError::ExternalDataUnavailable("replica lag".into())));
        counts.expect_count_common_post_likes().returning(|_, _| Ok(1));
        counts
            .expect_count_common_comment_likes()
            .returning(|_, _| Ok(1));
        let registry = FactorRegistry::new(default_factors(Arc::new(counts))).unwrap();
        let calculator = ConnectionStrengthCalculator::new(registry);

        let result = calculator
            .calculate_overall_strength(UserId(1), UserId(2))
            .await;

        assert!(matches!(result, Err(AppError::ExternalDataUnavailable(_))));
    }
}
