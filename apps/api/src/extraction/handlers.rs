use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::dispatcher::DispatchReceipt;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TriggerRequest {
    pub platform: Option<String>,
    /// `null` and absent both mean no targets.
    #[serde(default)]
    pub targets: Option<Vec<String>>,
}

/// POST /extraction/trigger
///
/// Answers 202 once the scrape job is running in the background.
pub async fn handle_trigger(
    State(state): State<AppState>,
    body: Result<Json<TriggerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DispatchReceipt>), AppError> {
    let Json(req) = body?;
    let receipt = state
        .dispatcher
        .trigger(req.platform.as_deref(), req.targets.unwrap_or_default())
        .await?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}
