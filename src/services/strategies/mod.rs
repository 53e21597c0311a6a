/// Recommendation strategies
///
/// A strategy turns the distance map produced by the graph traversal into scored,
/// ranked candidates. Strategies are stateless and registered by name once at startup;
/// exactly one of them is the default.
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{RecommendationCandidate, SocialDistances, UserId},
    services::strength::ConnectionStrengthCalculator,
};

pub mod connection_strength;
pub mod graph_distance;

pub use connection_strength::ConnectionStrengthStrategy;
pub use graph_distance::{DistanceScoring, GraphDistanceStrategy};

/// Named algorithm producing ranked candidates from social distances
#[async_trait::async_trait]
pub trait RecommendationStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Scores every candidate in `distances`, best first
    async fn generate_recommendations(
        &self,
        user_id: UserId,
        distances: &SocialDistances,
    ) -> AppResult<Vec<RecommendationCandidate>>;
}

/// Lookup table of strategies with a mandatory default
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn RecommendationStrategy>>,
    default: Arc<dyn RecommendationStrategy>,
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .field("default", &self.default.name())
            .finish()
    }
}

impl StrategyRegistry {
    /// Indexes `strategies` by name and resolves `default_name`
    ///
    /// Fails with a configuration error when a name is registered twice or when no
    /// strategy carries the default name. Callers should treat either as fatal.
    pub fn new(
        strategies: Vec<Arc<dyn RecommendationStrategy>>,
        default_name: &str,
    ) -> AppResult<Self> {
        let mut by_name = HashMap::with_capacity(strategies.len());

        for strategy in strategies {
            let name = strategy.name().to_string();
            if by_name.insert(name.clone(), strategy).is_some() {
                return Err(AppError::Configuration(format!(
                    "strategy '{}' registered twice",
                    name
                )));
            }
        }

        let default = by_name.get(default_name).cloned().ok_or_else(|| {
            AppError::Configuration(format!(
                "default strategy '{}' is not registered",
                default_name
            ))
        })?;

        tracing::info!(
            strategies = ?by_name.keys().collect::<Vec<_>>(),
            default = default_name,
            "Recommendation strategies registered"
        );

        Ok(Self {
            strategies: by_name,
            default,
        })
    }

    pub fn default_strategy(&self) -> Arc<dyn RecommendationStrategy> {
        self.default.clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RecommendationStrategy>> {
        self.strategies.get(name).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// The production strategy set
pub fn default_strategies(
    strength: Arc<ConnectionStrengthCalculator>,
    scoring: DistanceScoring,
) -> Vec<Arc<dyn RecommendationStrategy>> {
    vec![
        Arc::new(GraphDistanceStrategy::new(strength.clone(), scoring)),
        Arc::new(ConnectionStrengthStrategy::new(strength)),
    ]
}
