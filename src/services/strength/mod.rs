/// Connection strength scoring
///
/// A connection strength is the sum of several independent, weighted factors. Each
/// factor turns one raw interaction signal into a score in `[0, weight]`. Factors are
/// registered once at startup; the calculator runs all of them for a user pair.
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{UserId, SOCIAL_DISTANCE_FACTOR},
};

pub mod calculator;
pub mod factors;

pub use calculator::{ConnectionStrengthCalculator, MIN_CONNECTION_STRENGTH};
pub use factors::{default_factors, InteractionFactor, InteractionSignal};

/// A named, weighted signal contributing to connection strength
#[async_trait::async_trait]
pub trait ConnectionStrengthFactor: Send + Sync {
    /// Key under which this factor's score is reported
    fn name(&self) -> &str;

    /// Upper bound of this factor's contribution, in `(0, 1]`
    fn weight(&self) -> f64;

    /// Score for the pair, expected in `[0, weight]`
    async fn calculate_strength(&self, a: UserId, b: UserId) -> AppResult<f64>;
}

/// Fixed set of factors, indexed by name
pub struct FactorRegistry {
    factors: Vec<Arc<dyn ConnectionStrengthFactor>>,
    by_name: HashMap<String, usize>,
}

impl FactorRegistry {
    /// Builds the registry, rejecting duplicate names and out-of-range weights
    ///
    /// `socialDistance` is reserved: strategies write the distance term under that key.
    pub fn new(factors: Vec<Arc<dyn ConnectionStrengthFactor>>) -> AppResult<Self> {
        let mut by_name = HashMap::with_capacity(factors.len());

        for (index, factor) in factors.iter().enumerate() {
            let weight = factor.weight();
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(AppError::Configuration(format!(
                    "factor '{}' has weight {} outside (0, 1]",
                    factor.name(),
                    weight
                )));
            }
            if factor.name() == SOCIAL_DISTANCE_FACTOR {
                return Err(AppError::Configuration(format!(
                    "factor name '{}' is reserved for the distance term",
                    SOCIAL_DISTANCE_FACTOR
                )));
            }
            if by_name.insert(factor.name().to_string(), index).is_some() {
                return Err(AppError::Configuration(format!(
                    "factor '{}' registered twice",
                    factor.name()
                )));
            }
        }

        tracing::info!(
            factor_count = factors.len(),
            factors = ?by_name.keys().collect::<Vec<_>>(),
            "Connection strength factors registered"
        );

        Ok(Self { factors, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ConnectionStrengthFactor>> {
        self.by_name.get(name).map(|&index| &self.factors[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ConnectionStrengthFactor>> {
        self.factors.iter()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
