mod friendship;
mod recommendation;
mod user;

pub use friendship::{FriendshipEdge, FriendshipStatus};
pub use recommendation::{
    rank_candidates, FactorScores, RecommendationCandidate, SocialDistances,
    SOCIAL_DISTANCE_FACTOR,
};
pub use user::UserId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display() {
        assert_eq!(format!("{}", UserId(42)), "42");
    }

    #[test]
    fn test_user_id_serde_transparent() {
        let json = serde_json::to_string(&UserId(7)).unwrap();
        assert_eq!(json, "7");

        let deserialized: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, UserId(7));
    }

    #[test]
    fn test_friendship_status_storage_form() {
        assert_eq!(FriendshipStatus::Pending.as_str(), "PENDING");
        let json = serde_json::to_string(&FriendshipStatus::Declined).unwrap();
        assert_eq!(json, r#""DECLINED""#);
    }

    #[test]
    fn test_edge_other_endpoint() {
        let edge = FriendshipEdge::new(UserId(1), UserId(2), FriendshipStatus::Accepted);
        assert_eq!(edge.other(UserId(1)), Some(UserId(2)));
        assert_eq!(edge.other(UserId(2)), Some(UserId(1)));
        assert_eq!(edge.other(UserId(3)), None);
    }

    #[test]
    fn test_candidate_serializes_camel_case() {
        let mut scores = FactorScores::new();
        scores.insert(SOCIAL_DISTANCE_FACTOR.to_string(), 0.5);
        let candidate = RecommendationCandidate::new(UserId(9), 0.42, scores);

        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["candidateId"], 9);
        assert_eq!(json["factorScores"]["socialDistance"], 0.5);
        assert!(json.get("generatedAt").is_some());
    }

    #[test]
    fn test_rank_candidates_descending_with_id_tiebreak() {
        let mut candidates = vec![
            RecommendationCandidate::new(UserId(3), 0.2, FactorScores::new()),
            RecommendationCandidate::new(UserId(2), 0.9, FactorScores::new()),
            RecommendationCandidate::new(UserId(5), 0.5, FactorScores::new()),
            RecommendationCandidate::new(UserId(1), 0.5, FactorScores::new()),
        ];

        rank_candidates(&mut candidates);

        let order: Vec<i64> = candidates.iter().map(|c| c.candidate_id.0).collect();
        assert_eq!(order, vec![2, 1, 5, 3]);
    }
}
