use std::sync::Arc;
use std::time::Duration;

use crate::{config::Config, error::AppResult};

pub mod graph;
pub mod providers;
pub mod recommendations;
pub mod strategies;
pub mod strength;

pub use graph::SocialGraphService;
pub use recommendations::FriendRecommendationService;

use providers::{FriendshipEdgeProvider, InteractionCountProvider};
use strategies::{default_strategies, StrategyRegistry};
use strength::{default_factors, ConnectionStrengthCalculator, FactorRegistry};

/// Wires factors, strategies, the graph engine and the orchestrator
///
/// Runs once at startup. A configuration error here (duplicate factor, bad weight,
/// missing default strategy) must stop the process before it serves traffic.
pub fn build_recommendation_service(
    config: &Config,
    edges: Arc<dyn FriendshipEdgeProvider>,
    counts: Arc<dyn InteractionCountProvider>,
) -> AppResult<FriendRecommendationService> {
    let factors = FactorRegistry::new(default_factors(counts))?;
    let strength = Arc::new(ConnectionStrengthCalculator::new(factors));

    let strategies = StrategyRegistry::new(
        default_strategies(strength.clone(), config.distance_scoring),
        &config.default_strategy,
    )?;

    let graph = SocialGraphService::new(edges.clone(), strength)
        .with_max_edges_expanded(config.max_edges_expanded);

    Ok(
        FriendRecommendationService::new(Arc::new(graph), edges, Arc::new(strategies))
            .with_max_depth(config.max_depth)
            .with_timeout(Duration::from_millis(config.request_timeout_ms)),
    )
}
