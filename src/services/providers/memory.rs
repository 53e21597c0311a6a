use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::{
    error::{AppError, AppResult},
    models::{FriendshipEdge, FriendshipStatus, UserId},
    services::providers::{FriendshipEdgeProvider, InteractionCountProvider},
};

/// In-process relationship store
///
/// Implements both collaborator traits over plain maps. Used by the integration tests
/// and for running the service without a database.
#[derive(Clone, Default)]
pub struct InMemorySocialGraph {
    inner: Arc<RwLock<GraphData>>,
}

#[derive(Default)]
struct GraphData {
    users: HashSet<UserId>,
    edges: Vec<FriendshipEdge>,
    post_likes: HashMap<UserId, HashSet<i64>>,
    comment_likes: HashMap<UserId, HashSet<i64>>,
}

impl InMemorySocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: UserId) -> AppResult<()> {
        self.write()?.users.insert(user);
        Ok(())
    }

    /// Records a friendship; both endpoints become known users
    ///
    /// A later edge for the same pair replaces the earlier one, so a request can be
    /// moved from PENDING to ACCEPTED.
    pub fn add_friendship(&self, a: UserId, b: UserId, status: FriendshipStatus) -> AppResult<()> {
        if a == b {
            return Err(AppError::InvalidInput(format!(
                "user {} cannot befriend themselves",
                a
            )));
        }

        let mut data = self.write()?;
        data.users.insert(a);
        data.users.insert(b);
        data.edges
            .retain(|edge| !(edge.other(a) == Some(b) && edge.other(b) == Some(a)));
        data.edges.push(FriendshipEdge::new(a, b, status));
        Ok(())
    }

    pub fn like_post(&self, user: UserId, post_id: i64) -> AppResult<()> {
        let mut data = self.write()?;
        data.users.insert(user);
        data.post_likes.entry(user).or_default().insert(post_id);
        Ok(())
    }

    pub fn like_comment(&self, user: UserId, comment_id: i64) -> AppResult<()> {
        let mut data = self.write()?;
        data.users.insert(user);
        data.comment_likes.entry(user).or_default().insert(comment_id);
        Ok(())
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, GraphData>> {
        self.inner
            .read()
            .map_err(|_| AppError::ExternalDataUnavailable("in-memory graph lock poisoned".into()))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, GraphData>> {
        self.inner
            .write()
            .map_err(|_| AppError::ExternalDataUnavailable("in-memory graph lock poisoned".into()))
    }
}

impl GraphData {
    fn friends_of(&self, user: UserId, status: FriendshipStatus) -> HashSet<UserId> {
        self.edges
            .iter()
            .filter(|edge| edge.status == status)
            .filter_map(|edge| edge.other(user))
            .collect()
    }
}

fn shared(
    likes: &HashMap<UserId, HashSet<i64>>,
    a: UserId,
    b: UserId,
) -> u64 {
    match (likes.get(&a), likes.get(&b)) {
        (Some(left), Some(right)) => left.intersection(right).count() as u64,
        _ => 0,
    }
}

#[async_trait::async_trait]
impl FriendshipEdgeProvider for InMemorySocialGraph {
    async fn find_friend_ids(
        &self,
        user_id: UserId,
        status: FriendshipStatus,
    ) -> AppResult<HashSet<UserId>> {
        Ok(self.read()?.friends_of(user_id, status))
    }

    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.read()?.users.contains(&user_id))
    }
}

#[async_trait::async_trait]
impl InteractionCountProvider for InMemorySocialGraph {
    async fn count_mutual_friends(&self, a: UserId, b: UserId) -> AppResult<u64> {
        if a == b {
            return Ok(0);
        }
        let data = self.read()?;
        let left = data.friends_of(a, FriendshipStatus::Accepted);
        let right = data.friends_of(b, FriendshipStatus::Accepted);
        Ok(left.intersection(&right).count() as u64)
    }

    async fn count_common_post_likes(&self, a: UserId, b: UserId) -> AppResult<u64> {
        if a == b {
            return Ok(0);
        }
        Ok(shared(&self.read()?.post_likes, a, b))
    }

    async fn count_common_comment_likes(&self, a: UserId, b: UserId) -> AppResult<u64> {
        if a == b {
            return Ok(0);
        }
        Ok(shared(&self.read()?.comment_likes, a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_friend_ids_are_undirected_and_filtered_by_status() {
        let graph = InMemorySocialGraph::new();
        graph.add_friendship(UserId(1), UserId(2), FriendshipStatus::Accepted).unwrap();
        graph.add_friendship(UserId(3), UserId(1), FriendshipStatus::Accepted).unwrap();
        graph.add_friendship(UserId(1), UserId(4), FriendshipStatus::Pending).unwrap();

        let accepted = graph
            .find_friend_ids(UserId(1), FriendshipStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted, HashSet::from([UserId(2), UserId(3)]));

        let pending = graph
            .find_friend_ids(UserId(4), FriendshipStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending, HashSet::from([UserId(1)]));
    }

    #[tokio::test]
    async fn test_status_change_replaces_edge() {
        let graph = InMemorySocialGraph::new();
        graph.add_friendship(UserId(1), UserId(2), FriendshipStatus::Pending).unwrap();
        graph.add_friendship(UserId(2), UserId(1), FriendshipStatus::Accepted).unwrap();

        let pending = graph
            .find_friend_ids(UserId(1), FriendshipStatus::Pending)
            .await
            .unwrap();
        assert!(pending.is_empty());

        let accepted = graph
            .find_friend_ids(UserId(1), FriendshipStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted, HashSet::from([UserId(2)]));
    }

    #[test]
    fn test_self_friendship_rejected() {
        let graph = InMemorySocialGraph::new();
        let result = graph.add_friendship(UserId(1), UserId(1), FriendshipStatus::Accepted);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_interaction_counts() {
        let graph = InMemorySocialGraph::new();
        graph.add_friendship(UserId(1), UserId(3), FriendshipStatus::Accepted).unwrap();
        graph.add_friendship(UserId(2), UserId(3), FriendshipStatus::Accepted).unwrap();
        graph.add_friendship(UserId(2), UserId(4), FriendshipStatus::Blocked).unwrap();
        graph.add_friendship(UserId(1), UserId(4), FriendshipStatus::Accepted).unwrap();
        for post in [10, 11, 12] {
            graph.like_post(UserId(1), post).unwrap();
        }
        for post in [11, 12, 13] {
            graph.like_post(UserId(2), post).unwrap();
        }
        graph.like_comment(UserId(1), 100).unwrap();
        graph.like_comment(UserId(2), 100).unwrap();

        assert_eq!(graph.count_mutual_friends(UserId(1), UserId(2)).await.unwrap(), 1);
        assert_eq!(graph.count_common_post_likes(UserId(1), UserId(2)).await.unwrap(), 2);
        assert_eq!(graph.count_common_comment_likes(UserId(1), UserId(2)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counts_are_zero_for_same_user() {
        let graph = InMemorySocialGraph::new();
        graph.like_post(UserId(1), 10).unwrap();
        graph.add_friendship(UserId(1), UserId(2), FriendshipStatus::Accepted).unwrap();

        assert_eq!(graph.count_mutual_friends(UserId(1), UserId(1)).await.unwrap(), 0);
        assert_eq!(graph.count_common_post_likes(UserId(1), UserId(1)).await.unwrap(), 0);
        assert_eq!(graph.count_common_comment_likes(UserId(1), UserId(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_user_exists() {
        let graph = InMemorySocialGraph::new();
        graph.add_user(UserId(5)).unwrap();

        assert!(graph.user_exists(UserId(5)).await.unwrap());
        assert!(!graph.user_exists(UserId(6)).await.unwrap());
    }
}
