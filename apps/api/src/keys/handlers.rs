use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::keys::bulk::{apply_bulk_update, BulkKeyUpdate};
use crate::models::keys::KeyPoolSummary;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub status: &'static str,
    pub inserted: usize,
}

/// POST /keys/bulk_update
pub async fn handle_bulk_update(
    State(state): State<AppState>,
    body: Result<Json<BulkKeyUpdate>, JsonRejection>,
) -> Result<Json<BulkUpdateResponse>, AppError> {
    let Json(update) = body?;
    let outcome = apply_bulk_update(state.keys.as_ref(), &update).await?;
    Ok(Json(BulkUpdateResponse {
        status: "Keys updated successfully",
        inserted: outcome.inserted,
    }))
}

/// GET /keys/summary
pub async fn handle_key_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<KeyPoolSummary>>, AppError> {
    Ok(Json(state.keys.active_summary().await?))
}
