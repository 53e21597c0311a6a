/// Relationship and interaction data sources
///
/// The recommendation engine never talks to storage directly. It reads the friendship
/// graph and pairwise interaction counts through the two traits below, so the same
/// engine runs against Postgres in production and an in-memory graph in tests.
use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{FriendshipStatus, UserId},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemorySocialGraph;
pub use postgres::PgSocialStore;

/// Read access to the friendship relation
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FriendshipEdgeProvider: Send + Sync {
    /// Ids of every user linked to `user_id` by a friendship in `status`
    ///
    /// Friendships are undirected here: it does not matter which side sent the request.
    async fn find_friend_ids(
        &self,
        user_id: UserId,
        status: FriendshipStatus,
    ) -> AppResult<HashSet<UserId>>;

    /// Whether `user_id` refers to a known account
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool>;
}

/// Raw pairwise interaction counts
///
/// Every count is 0 when both ids are the same user.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionCountProvider: Send + Sync {
    /// Users who are accepted friends of both `a` and `b`
    async fn count_mutual_friends(&self, a: UserId, b: UserId) -> AppResult<u64>;

    /// Posts liked by both `a` and `b`
    async fn count_common_post_likes(&self, a: UserId, b: UserId) -> AppResult<u64>;

    /// Comments liked by both `a` and `b`
    async fn count_common_comment_likes(&self, a: UserId, b: UserId) -> AppResult<u64>;
}
