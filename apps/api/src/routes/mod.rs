pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::keys::handlers as keys;
use crate::results::handlers as results;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Credential Store
        .route("/keys/bulk_update", post(keys::handle_bulk_update))
        .route("/keys/summary", get(keys::handle_key_summary))
        // Extraction Dispatcher
        .route("/extraction/trigger", post(extraction::handle_trigger))
        // Query Layer / Metrics
        .route("/results/latest", get(results::handle_latest))
        .route("/results/user_history", get(results::handle_user_history))
        .route("/metrics", get(results::handle_metrics))
        .with_state(state)
}
