//! Credential Store backends.
//!
//! `AppState` holds an `Arc<dyn CredentialStore>`: `PgCredentialStore` in production,
//! `keys::memory::MemoryCredentialStore` in tests.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::keys::{KeyPoolSummary, ScraperKeyRow};
use crate::models::platform::{Platform, Purpose};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Active key values for a platform. `None` leaves the purpose unconstrained.
    async fn list_active(
        &self,
        platform: Platform,
        purpose: Option<Purpose>,
    ) -> Result<Vec<String>, AppError>;

    /// Marks every key of the pair inactive. Returns the number of rows touched.
    async fn deactivate_all(&self, platform: Platform, purpose: Purpose) -> Result<u64, AppError>;

    /// Inserts a new active key.
    async fn insert(
        &self,
        platform: Platform,
        purpose: Purpose,
        key_value: &str,
    ) -> Result<(), AppError>;

    /// Active key counts per pool, pools without active keys omitted.
    async fn active_summary(&self) -> Result<Vec<KeyPoolSummary>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn list_active(
        &self,
        platform: Platform,
        purpose: Option<Purpose>,
    ) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query_as::<_, ScraperKeyRow>(
            r#"
            SELECT * FROM scraper_keys
            WHERE platform = $1
              AND ($2::TEXT IS NULL OR purpose = $2)
              AND is_active
            ORDER BY id
            "#,
        )
        .bind(platform.as_str())
        .bind(purpose.map(|p| p.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.key_value).collect())
    }

    async fn deactivate_all(&self, platform: Platform, purpose: Purpose) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE scraper_keys SET is_active = FALSE WHERE platform = $1 AND purpose = $2 AND is_active",
        )
        .bind(platform.as_str())
        .bind(purpose.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert(
        &self,
        platform: Platform,
        purpose: Purpose,
        key_value: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO scraper_keys (platform, purpose, key_value, is_active) VALUES ($1, $2, $3, TRUE)",
        )
        .bind(platform.as_str())
        .bind(purpose.as_str())
        .bind(key_value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn active_summary(&self) -> Result<Vec<KeyPoolSummary>, AppError> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            r#"
            SELECT platform, purpose, COUNT(*)
            FROM scraper_keys
            WHERE is_active
            GROUP BY platform, purpose
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // Rows written outside this service may carry codes we don't know; skip them.
        let mut summary: Vec<KeyPoolSummary> = rows
            .into_iter()
            .filter_map(|(platform, purpose, active)| {
                Some(KeyPoolSummary {
                    platform: platform.parse().ok()?,
                    purpose: purpose.parse().ok()?,
                    active,
                })
            })
            .collect();
        // Enum order, not text order: search before posts.
        summary.sort_by_key(|s| (s.platform, s.purpose));
        Ok(summary)
    }
}
