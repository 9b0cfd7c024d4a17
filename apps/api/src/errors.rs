use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::platform::{Platform, Purpose};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No active credentials for platform '{0}'")]
    NoCredentials(Platform),

    #[error("Missing {} keys for platform '{platform}'", join_pools(.pools))]
    MissingKeys {
        platform: Platform,
        pools: Vec<Purpose>,
    },

    #[error("Could not start extraction: {0}")]
    DispatchFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A body that fails to parse or has the wrong shape is a validation error, not
/// axum's plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

fn join_pools(pools: &[Purpose]) -> String {
    pools
        .iter()
        .map(Purpose::as_str)
        .collect::<Vec<_>>()
        .join(" and ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::MissingParameter(_) => (StatusCode::BAD_REQUEST, "MISSING_PARAMETER"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NoCredentials(_) => (StatusCode::BAD_REQUEST, "NO_CREDENTIALS"),
            AppError::MissingKeys { .. } => (StatusCode::BAD_REQUEST, "MISSING_KEYS"),
            AppError::DispatchFailed(_) => (StatusCode::BAD_REQUEST, "DISPATCH_FAILED"),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (StatusCode::BAD_REQUEST, "STORAGE_ERROR")
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}
