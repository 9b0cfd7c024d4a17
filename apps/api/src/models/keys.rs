use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::platform::{Platform, Purpose};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScraperKeyRow {
    pub id: i64,
    pub platform: String,
    pub purpose: String,
    pub key_value: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Number of active keys for one (platform, purpose) pool. Key values are never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPoolSummary {
    pub platform: Platform,
    pub purpose: Purpose,
    pub active: i64,
}
