use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{FriendshipStatus, SocialDistances, UserId},
    services::{
        providers::FriendshipEdgeProvider,
        strength::{ConnectionStrengthCalculator, MIN_CONNECTION_STRENGTH},
    },
};

/// Share of an edge's unit cost that connection strength can take off
const STRENGTH_DISCOUNT: f64 = 0.3;

/// Default cap on edges scored during one traversal
pub const DEFAULT_MAX_EDGES_EXPANDED: usize = 10_000;

/// Cost of walking the friendship between two users with the given strength
///
/// Strength is clamped to `[0.1, 1.0]`, so the weight always lies in `[0.7, 0.97]`.
pub fn edge_weight(strength: f64) -> f64 {
    1.0 - strength.clamp(MIN_CONNECTION_STRENGTH, 1.0) * STRENGTH_DISCOUNT
}

/// Weighted shortest-path search over the accepted-friendship graph
///
/// Neighbours are fetched lazily, one `find_friend_ids` call per settled user, and every
/// edge considered costs one connection strength computation. `max_depth` bounds the
/// cumulative edge weight rather than the hop count, so a close friend-of-a-friend can
/// end up nearer than a weakly connected direct friend.
///
/// When the edge cap is hit, only users already settled are returned. Every settled
/// user was popped in distance order after fully expanding its predecessors, so the
/// truncated result does not depend on the order in which neighbours are visited.
///
/// Reads are not isolated from each other: a friendship that changes mid-traversal may
/// or may not be reflected in the result.
pub struct SocialGraphService {
    edges: Arc<dyn FriendshipEdgeProvider>,
    strength: Arc<ConnectionStrengthCalculator>,
    max_edges_expanded: usize,
}

impl SocialGraphService {
    pub fn new(
        edges: Arc<dyn FriendshipEdgeProvider>,
        strength: Arc<ConnectionStrengthCalculator>,
    ) -> Self {
        Self {
            edges,
            strength,
            max_edges_expanded: DEFAULT_MAX_EDGES_EXPANDED,
        }
    }

    /// Caps the number of edges scored per traversal
    pub fn with_max_edges_expanded(mut self, max_edges_expanded: usize) -> Self {
        self.max_edges_expanded = max_edges_expanded.max(1);
        self
    }

    /// Distance from `start` to every user reachable within `max_depth`
    ///
    /// The start user is never part of the result. A user without accepted friends,
    /// including one that does not exist, yields an empty map.
    #[instrument(skip(self), fields(start = %start))]
    pub async fn find_social_distances(
        &self,
        start: UserId,
        max_depth: f64,
    ) -> AppResult<SocialDistances> {
        if !(max_depth > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "max depth must be positive, got {}",
                max_depth
            )));
        }

        let started = Instant::now();
        let mut tentative: HashMap<UserId, f64> = HashMap::from([(start, 0.0)]);
        let mut settled: HashSet<UserId> = HashSet::new();
        let mut distances = SocialDistances::new();
        let mut frontier = BinaryHeap::new();
        let mut edges_expanded = 0usize;
        let mut truncated = false;

        frontier.push(FrontierEntry {
            distance: 0.0,
            user: start,
        });

        'search: while let Some(FrontierEntry { distance, user }) = frontier.pop() {
            if !settled.insert(user) {
                continue;
            }
            if user != start {
                distances.insert(user, distance);
            }

            let friends = self
                .edges
                .find_friend_ids(user, FriendshipStatus::Accepted)
                .await?;

            for friend in friends {
                if friend == start || settled.contains(&friend) {
                    continue;
                }
                if edges_expanded >= self.max_edges_expanded {
                    truncated = true;
                    break 'search;
                }
                edges_expanded += 1;

                let strength = self
                    .strength
                    .calculate_overall_strength(user, friend)
                    .await?;
                let candidate = distance + edge_weight(strength);
                if candidate > max_depth {
                    continue;
                }

                let improves = tentative
                    .get(&friend)
                    .map_or(true, |&known| candidate < known);
                if improves {
                    tentative.insert(friend, candidate);
                    frontier.push(FrontierEntry {
                        distance: candidate,
                        user: friend,
                    });
                }
            }
        }

        if truncated {
            tracing::warn!(
                edges_expanded,
                settled = distances.len(),
                "Edge budget exhausted, returning distances settled so far"
            );
        }

        tracing::debug!(
            reachable = distances.len(),
            edges_expanded,
            elapsed_ms = started.elapsed().as_millis(),
            "Social distances computed"
        );

        Ok(distances)
    }
}

/// Min-heap entry for the frontier
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    distance: f64,
    user: UserId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap pops the smallest distance first, lower id on ties.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.user.cmp(&self.user))
    }
}
