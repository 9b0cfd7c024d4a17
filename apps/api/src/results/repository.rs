//! Read access to stored posts.
//!
//! Rows are resolved to `Post` (defaults applied) here, at the repository boundary.
//! `PgPostRepository` serves production; `results::memory::MemoryPostRepository` backs
//! the tests and applies the same filtering, ordering and weekday rules in Rust.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

use crate::errors::AppError;
use crate::models::post::{Post, ScrapeResultRow};

/// PostgreSQL SQLSTATE for an invalid regular expression.
const INVALID_REGULAR_EXPRESSION: &str = "2201B";

/// Already-validated filter for the latest-posts listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestFilter {
    pub platform: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: i64,
}

/// Raw aggregates the metrics report is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsInputs {
    pub total_posts: i64,
    pub distinct_profiles: i64,
    /// Mean engagement over posts with followers; `None` when there are none.
    pub avg_engagement: Option<f64>,
    pub platform_counts: Vec<(String, i64)>,
    /// Counts in the weekly window keyed by day number, 1 = Sunday .. 7 = Saturday.
    pub weekday_counts: Vec<(i32, i64)>,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Newest first, filtered by platform (case-insensitive) and `created_at > since`.
    async fn latest(&self, filter: &LatestFilter) -> Result<Vec<Post>, AppError>;

    /// Newest first. Matches usernames against `pattern` as a case-insensitive regular
    /// expression, or equal to it ignoring case. An invalid pattern falls back to the
    /// equality match.
    async fn by_username(&self, pattern: &str, limit: i64) -> Result<Vec<Post>, AppError>;

    /// Aggregates over all posts; weekday counts cover `window_start..=window_end`.
    async fn metrics_inputs(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<MetricsInputs, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn by_username_exact(&self, username: &str, limit: i64) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, ScrapeResultRow>(
            r#"
            SELECT * FROM scrape_results
            WHERE lower(username) = lower($1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn latest(&self, filter: &LatestFilter) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, ScrapeResultRow>(
            r#"
            SELECT * FROM scrape_results
            WHERE ($1::TEXT IS NULL OR lower(platform) = lower($1))
              AND ($2::TIMESTAMPTZ IS NULL OR created_at > $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(filter.platform.as_deref())
        .bind(filter.since)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn by_username(&self, pattern: &str, limit: i64) -> Result<Vec<Post>, AppError> {
        let result = sqlx::query_as::<_, ScrapeResultRow>(
            r#"
            SELECT * FROM scrape_results
            WHERE username ~* $1 OR lower(username) = lower($1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;

        match result {
            Ok(rows) => Ok(rows.into_iter().map(Post::from).collect()),
            Err(sqlx::Error::Database(e))
                if e.code().as_deref() == Some(INVALID_REGULAR_EXPRESSION) =>
            {
                warn!("Invalid username pattern '{pattern}', matching exactly: {e}");
                self.by_username_exact(pattern, limit).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn metrics_inputs(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<MetricsInputs, AppError> {
        let (total_posts, distinct_profiles): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COUNT(DISTINCT username) FROM scrape_results")
                .fetch_one(&self.pool)
                .await?;

        let avg_engagement: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT AVG((COALESCE(likes, 0) + COALESCE(comments, 0)) * 100.0 / followers)::FLOAT8
            FROM scrape_results
            WHERE followers > 0
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let platform_counts: Vec<(String, i64)> = sqlx::query_as(
            "SELECT platform, COUNT(*) FROM scrape_results GROUP BY platform ORDER BY platform",
        )
        .fetch_all(&self.pool)
        .await?;

        // DOW is 0 = Sunday; shift to 1 = Sunday .. 7 = Saturday.
        let weekday_counts: Vec<(i32, i64)> = sqlx::query_as(
            r#"
            SELECT (EXTRACT(DOW FROM created_at AT TIME ZONE 'UTC')::INT + 1) AS day_num,
                   COUNT(*)
            FROM scrape_results
            WHERE created_at >= $1 AND created_at <= $2
            GROUP BY day_num
            "#,
        )
        .bind(window_start)
        .bind(window_end)
        .fetch_all(&self.pool)
        .await?;

        Ok(MetricsInputs {
            total_posts,
            distinct_profiles,
            avg_engagement,
            platform_counts,
            weekday_counts,
        })
    }
}
