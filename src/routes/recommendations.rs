use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationCandidate, UserId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Registered strategy name; the configured default when absent
    pub strategy: Option<String>,
}

/// Handler for the friend recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendationCandidate>>> {
    let user_id = UserId(user_id);

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        strategy = params.strategy.as_deref().unwrap_or("default"),
        "Processing recommendation request"
    );

    let candidates = state
        .recommendations
        .get_friend_recommendations_with(user_id, params.strategy.as_deref())
        .await?;

    Ok(Json(candidates))
}
