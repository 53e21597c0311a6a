use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{FriendshipStatus, RecommendationCandidate, UserId},
    services::{
        graph::SocialGraphService, providers::FriendshipEdgeProvider,
        strategies::StrategyRegistry,
    },
};

/// Traversal budget used for every recommendation request
pub const DEFAULT_MAX_DEPTH: f64 = 3.0;

/// Default deadline for one recommendation request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Generates friend suggestions for one user
///
/// Pipeline:
/// 1. Resolve the strategy (the registry default unless one is named)
/// 2. Compute social distances from the user over accepted friendships
/// 3. Fetch the user's current accepted friends
/// 4. Let the strategy score and rank every reachable user
/// 5. Drop the user and everyone they are already friends with
///
/// Nothing is cached: every call recomputes from the current relationship data.
pub struct FriendRecommendationService {
    graph: Arc<SocialGraphService>,
    edges: Arc<dyn FriendshipEdgeProvider>,
    strategies: Arc<StrategyRegistry>,
    max_depth: f64,
    timeout: Duration,
}

impl FriendRecommendationService {
    pub fn new(
        graph: Arc<SocialGraphService>,
        edges: Arc<dyn FriendshipEdgeProvider>,
        strategies: Arc<StrategyRegistry>,
    ) -> Self {
        Self {
            graph,
            edges,
            strategies,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_max_depth(mut self, max_depth: f64) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ranked suggestions for `user_id` using the default strategy
    pub async fn get_friend_recommendations(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<RecommendationCandidate>> {
        self.get_friend_recommendations_with(user_id, None).await
    }

    /// Ranked suggestions for `user_id` using the named strategy, or the default
    #[instrument(skip(self))]
    pub async fn get_friend_recommendations_with(
        &self,
        user_id: UserId,
        strategy_name: Option<&str>,
    ) -> AppResult<Vec<RecommendationCandidate>> {
        let start = Instant::now();

        let result = tokio::time::timeout(self.timeout, self.recommend(user_id, strategy_name))
            .await
            .map_err(|_| {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis(),
                    "Recommendation request exceeded its deadline"
                );
                AppError::Timeout(format!(
                    "recommendations for user {} took longer than {} ms",
                    user_id,
                    self.timeout.as_millis()
                ))
            })?;

        if let Ok(candidates) = &result {
            tracing::info!(
                returned = candidates.len(),
                processing_time_ms = start.elapsed().as_millis(),
                "Recommendations generated"
            );
        }

        result
    }

    async fn recommend(
        &self,
        user_id: UserId,
        strategy_name: Option<&str>,
    ) -> AppResult<Vec<RecommendationCandidate>> {
        let strategy = match strategy_name {
            Some(name) => self.strategies.get(name).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "unknown strategy '{}', expected one of {:?}",
                    name,
                    self.strategies.names()
                ))
            })?,
            None => self.strategies.default_strategy(),
        };

        if !self.edges.user_exists(user_id).await? {
            return Err(AppError::InvalidInput(format!("unknown user {}", user_id)));
        }

        let distances = self
            .graph
            .find_social_distances(user_id, self.max_depth)
            .await?;

        let existing_friends = self
            .edges
            .find_friend_ids(user_id, FriendshipStatus::Accepted)
            .await?;

        tracing::debug!(
            strategy = strategy.name(),
            reachable = distances.len(),
            existing_friends = existing_friends.len(),
            "Scoring candidates"
        );

        if distances.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = strategy
            .generate_recommendations(user_id, &distances)
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|c| c.candidate_id != user_id && !existing_friends.contains(&c.candidate_id))
            .collect())
    }
}
