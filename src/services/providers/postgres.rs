/// Postgres-backed relationship store
///
/// Schema lives in `migrations/`. Friendships are stored once per unordered pair
/// (`idx_friendships_pair`) with the requester on the left; every query below reads
/// them in both directions.
use std::collections::HashSet;

use sqlx::PgPool;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{FriendshipStatus, UserId},
    services::providers::{FriendshipEdgeProvider, InteractionCountProvider},
};

const FRIEND_IDS_QUERY: &str = r#"
    SELECT CASE WHEN requester_id = $1 THEN addressee_id ELSE requester_id END AS friend_id
    FROM friendships
    WHERE (requester_id = $1 OR addressee_id = $1) AND status = $2
"#;

const MUTUAL_FRIENDS_QUERY: &str = r#"
    SELECT COUNT(*) FROM (
        SELECT CASE WHEN requester_id = $1 THEN addressee_id ELSE requester_id END
        FROM friendships
        WHERE (requester_id = $1 OR addressee_id = $1) AND status = 'ACCEPTED'
        INTERSECT
        SELECT CASE WHEN requester_id = $2 THEN addressee_id ELSE requester_id END
        FROM friendships
        WHERE (requester_id = $2 OR addressee_id = $2) AND status = 'ACCEPTED'
    ) AS mutual
"#;

const COMMON_POST_LIKES_QUERY: &str = r#"
    SELECT COUNT(*)
    FROM post_likes a
    JOIN post_likes b ON a.post_id = b.post_id
    WHERE a.user_id = $1 AND b.user_id = $2
"#;

const COMMON_COMMENT_LIKES_QUERY: &str = r#"
    SELECT COUNT(*)
    FROM comment_likes a
    JOIN comment_likes b ON a.comment_id = b.comment_id
    WHERE a.user_id = $1 AND b.user_id = $2
"#;

#[derive(Clone)]
pub struct PgSocialStore {
    pool: PgPool,
}

impl PgSocialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_pair(&self, query: &'static str, a: UserId, b: UserId) -> AppResult<u64> {
        if a == b {
            return Ok(0);
        }

        let count: i64 = sqlx::query_scalar(query)
            .bind(a)
            .bind(b)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}

#[async_trait::async_trait]
impl FriendshipEdgeProvider for PgSocialStore {
    #[instrument(skip(self))]
    async fn find_friend_ids(
        &self,
        user_id: UserId,
        status: FriendshipStatus,
    ) -> AppResult<HashSet<UserId>> {
        let ids: Vec<UserId> = sqlx::query_scalar(FRIEND_IDS_QUERY)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().filter(|id| *id != user_id).collect())
    }

    #[instrument(skip(self))]
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

#[async_trait::async_trait]
impl InteractionCountProvider for PgSocialStore {
    async fn count_mutual_friends(&self, a: UserId, b: UserId) -> AppResult<u64> {
        self.count_pair(MUTUAL_FRIENDS_QUERY, a, b).await
    }

    async fn count_common_post_likes(&self, a: UserId, b: UserId) -> AppResult<u64> {
        self.count_pair(COMMON_POST_LIKES_QUERY, a, b).await
    }

    async fn count_common_comment_likes(&self, a: UserId, b: UserId) -> AppResult<u64> {
        self.count_pair(COMMON_COMMENT_LIKES_QUERY, a, b).await
    }
}
