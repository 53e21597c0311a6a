use std::sync::Arc;

use crate::{
    error::AppResult,
    models::UserId,
    services::{providers::InteractionCountProvider, strength::ConnectionStrengthFactor},
};

pub const MUTUAL_FRIENDS_WEIGHT: f64 = 0.40;
pub const MUTUAL_FRIENDS_CEILING: f64 = 10.0;

pub const COMMON_LIKES_WEIGHT: f64 = 0.25;
pub const COMMON_LIKES_CEILING: f64 = 10.0;

pub const COMMON_COMMENTS_WEIGHT: f64 = 0.20;
pub const COMMON_COMMENTS_CEILING: f64 = 5.0;

/// Raw interaction count a factor is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionSignal {
    MutualFriends,
    CommonPostLikes,
    CommonCommentLikes,
}

/// Factor that saturates one interaction count against a fixed ceiling
///
/// `score = min(raw / ceiling, 1) * weight`
pub struct InteractionFactor {
    name: &'static str,
    weight: f64,
    ceiling: f64,
    signal: InteractionSignal,
    counts: Arc<dyn InteractionCountProvider>,
}

impl InteractionFactor {
    pub fn new(
        name: &'static str,
        weight: f64,
        ceiling: f64,
        signal: InteractionSignal,
        counts: Arc<dyn InteractionCountProvider>,
    ) -> Self {
        Self {
            name,
            weight,
            ceiling,
            signal,
            counts,
        }
    }

    pub fn mutual_friends(counts: Arc<dyn InteractionCountProvider>) -> Self {
        Self::new(
            "mutualFriends",
            MUTUAL_FRIENDS_WEIGHT,
            MUTUAL_FRIENDS_CEILING,
            InteractionSignal::MutualFriends,
            counts,
        )
    }

    pub fn common_likes(counts: Arc<dyn InteractionCountProvider>) -> Self {
        Self::new(
            "commonLikes",
            COMMON_LIKES_WEIGHT,
            COMMON_LIKES_CEILING,
            InteractionSignal::CommonPostLikes,
            counts,
        )
    }

    pub fn common_comments(counts: Arc<dyn InteractionCountProvider>) -> Self {
        Self::new(
            "commonComments",
            COMMON_COMMENTS_WEIGHT,
            COMMON_COMMENTS_CEILING,
            InteractionSignal::CommonCommentLikes,
            counts,
        )
    }

    async fn raw_count(&self, a: UserId, b: UserId) -> AppResult<u64> {
        match self.signal {
            InteractionSignal::MutualFriends => self.counts.count_mutual_friends(a, b).await,
            InteractionSignal::CommonPostLikes => self.counts.count_common_post_likes(a, b).await,
            InteractionSignal::CommonCommentLikes => {
                self.counts.count_common_comment_likes(a, b).await
            }
        }
    }
}

#[async_trait::async_trait]
impl ConnectionStrengthFactor for InteractionFactor {
    fn name(&self) -> &str {
        self.name
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    async fn calculate_strength(&self, a: UserId, b: UserId) -> AppResult<f64> {
        let raw = self.raw_count(a, b).await?;
        Ok(saturate(raw, self.ceiling, self.weight))
    }
}

fn saturate(raw: u64, ceiling: f64, weight: f64) -> f64 {
    if ceiling <= 0.0 {
        return 0.0;
    }
    (raw as f64 / ceiling).min(1.0) * weight
}

/// The production factor set, in registration order
pub fn default_factors(
    counts: Arc<dyn InteractionCountProvider>,
) -> Vec<Arc<dyn ConnectionStrengthFactor>> {
    vec![
        Arc::new(InteractionFactor::mutual_friends(counts.clone())),
        Arc::new(InteractionFactor::common_likes(counts.clone())),
        Arc::new(InteractionFactor::common_comments(counts)),
    ]
}
