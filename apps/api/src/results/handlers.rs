use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::post::Post;
use crate::results::metrics::{compute_metrics, MetricsReport};
use crate::results::query::{list_latest, search_by_user, LatestParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub query: String,
}

/// GET /results/latest?since=&platform=&limit=
pub async fn handle_latest(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(list_latest(state.posts.as_ref(), params).await?))
}

/// GET /results/user_history?query=
pub async fn handle_user_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(search_by_user(state.posts.as_ref(), &params.query).await?))
}

/// GET /metrics
pub async fn handle_metrics(
    State(state): State<AppState>,
) -> Result<Json<MetricsReport>, AppError> {
    Ok(Json(compute_metrics(state.posts.as_ref(), Utc::now()).await?))
}
