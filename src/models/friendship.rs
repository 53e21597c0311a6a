use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::UserId;

/// Lifecycle state of a friendship request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Declined,
    Blocked,
}

impl FriendshipStatus {
    /// Storage form used in the `friendships.status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "PENDING",
            FriendshipStatus::Accepted => "ACCEPTED",
            FriendshipStatus::Declined => "DECLINED",
            FriendshipStatus::Blocked => "BLOCKED",
        }
    }
}

impl Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A friendship relation between two users
///
/// Stored with a direction (who asked whom) but traversed as undirected once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendshipEdge {
    pub user_a: UserId,
    pub user_b: UserId,
    pub status: FriendshipStatus,
}

impl FriendshipEdge {
    pub fn new(user_a: UserId, user_b: UserId, status: FriendshipStatus) -> Self {
        Self {
            user_a,
            user_b,
            status,
        }
    }

    /// Returns the endpoint opposite to `user`, if `user` is on this edge
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if self.user_a == user {
            Some(self.user_b)
        } else if self.user_b == user {
            Some(self.user_a)
        } else {
            None
        }
    }
}
