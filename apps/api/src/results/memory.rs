//! In-memory `PostRepository` for tests. Same filtering, ordering and weekday rules as
//! the PostgreSQL queries.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use regex::RegexBuilder;
use tracing::warn;

use crate::errors::AppError;
use crate::models::post::{Post, ScrapeResultRow};
use crate::results::repository::{LatestFilter, MetricsInputs, PostRepository};

/// Day number of a timestamp, 1 = Sunday .. 7 = Saturday, in UTC.
pub fn weekday_number(ts: DateTime<Utc>) -> i32 {
    ts.weekday().number_from_sunday() as i32
}

#[derive(Default)]
pub struct MemoryPostRepository {
    rows: Mutex<Vec<ScrapeResultRow>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, row: ScrapeResultRow) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.push(row);
        }
    }

    /// Rows matching `keep`, newest first, truncated to `limit`.
    fn select(
        &self,
        keep: impl Fn(&ScrapeResultRow) -> bool,
        limit: i64,
    ) -> Result<Vec<Post>, AppError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| AppError::Storage("post repository lock poisoned".to_string()))?;
        let mut matched: Vec<&ScrapeResultRow> = rows.iter().filter(|r| keep(*r)).collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matched
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .map(Post::from)
            .collect())
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn latest(&self, filter: &LatestFilter) -> Result<Vec<Post>, AppError> {
        let platform = filter.platform.as_deref().map(str::to_lowercase);
        self.select(
            |r| {
                platform
                    .as_deref()
                    .map_or(true, |p| r.platform.to_lowercase() == p)
                    && filter.since.map_or(true, |since| r.created_at > since)
            },
            filter.limit,
        )
    }

    async fn by_username(&self, pattern: &str, limit: i64) -> Result<Vec<Post>, AppError> {
        let lowered = pattern.to_lowercase();
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Invalid username pattern '{pattern}', matching exactly: {e}");
                None
            }
        };
        self.select(
            |r| {
                r.username.to_lowercase() == lowered
                    || regex.as_ref().is_some_and(|re| re.is_match(&r.username))
            },
            limit,
        )
    }

    async fn metrics_inputs(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<MetricsInputs, AppError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| AppError::Storage("post repository lock poisoned".to_string()))?;

        let profiles: HashSet<&str> = rows.iter().map(|r| r.username.as_str()).collect();

        let rates: Vec<f64> = rows
            .iter()
            .filter_map(|r| {
                let followers = r.followers.filter(|f| *f > 0)?;
                let interactions = r.likes.unwrap_or(0) + r.comments.unwrap_or(0);
                Some(interactions as f64 * 100.0 / followers as f64)
            })
            .collect();
        let avg_engagement =
            (!rates.is_empty()).then(|| rates.iter().sum::<f64>() / rates.len() as f64);

        let mut platforms: BTreeMap<String, i64> = BTreeMap::new();
        let mut weekdays: BTreeMap<i32, i64> = BTreeMap::new();
        for row in rows.iter() {
            *platforms.entry(row.platform.clone()).or_default() += 1;
            if row.created_at >= window_start && row.created_at <= window_end {
                *weekdays.entry(weekday_number(row.created_at)).or_default() += 1;
            }
        }

        Ok(MetricsInputs {
            total_posts: rows.len() as i64,
            distinct_profiles: profiles.len() as i64,
            avg_engagement,
            platform_counts: platforms.into_iter().collect(),
            weekday_counts: weekdays.into_iter().collect(),
        })
    }
}

pub(crate) mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::models::post::ScrapeResultRow;

    pub fn row(id: i64, platform: &str, username: &str, created_at: DateTime<Utc>) -> ScrapeResultRow {
        ScrapeResultRow {
            id,
            platform: platform.to_string(),
            username: username.to_string(),
            description: Some(format!("post {id}")),
            likes: Some(0),
            comments: Some(0),
            followers: Some(0),
            post_date: None,
            sentiment: None,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::fixtures::row;
    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    fn seeded() -> MemoryPostRepository {
        let repo = MemoryPostRepository::new();
        repo.insert(row(1, "ig", "alice", at(10, 8)));
        repo.insert(row(2, "tk", "bob", at(11, 8)));
        repo.insert(row(3, "IG", "Alice_Fans", at(12, 8)));
        repo.insert(row(4, "x", "carol", at(13, 8)));
        repo
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_latest_orders_newest_first_and_limits() {
        let repo = seeded();
        let filter = LatestFilter {
            platform: None,
            since: None,
            limit: 3,
        };
        assert_eq!(ids(&repo.latest(&filter).await.unwrap()), vec![4, 3, 2]);
    }

    #[tokio::test]
    async fn test_latest_platform_is_case_insensitive() {
        let repo = seeded();
        let filter = LatestFilter {
            platform: Some("Ig".to_string()),
            since: None,
            limit: 100,
        };
        assert_eq!(ids(&repo.latest(&filter).await.unwrap()), vec![3, 1]);
    }

    #[tokio::test]
    async fn test_latest_since_is_strict() {
        let repo = seeded();
        let filter = LatestFilter {
            platform: None,
            since: Some(at(11, 8)),
            limit: 100,
        };
        assert_eq!(ids(&repo.latest(&filter).await.unwrap()), vec![4, 3]);
    }

    #[tokio::test]
    async fn test_username_regex_and_exact() {
        let repo = seeded();
        assert_eq!(ids(&repo.by_username("^alice", 500).await.unwrap()), vec![3, 1]);
        assert_eq!(ids(&repo.by_username("ALICE$", 500).await.unwrap()), vec![1]);
    }

    #[tokio::test]
    async fn test_invalid_regex_falls_back_to_exact_match() {
        let repo = MemoryPostRepository::new();
        repo.insert(row(1, "x", "a(b", at(10, 8)));
        repo.insert(row(2, "x", "ab", at(11, 8)));
        assert_eq!(ids(&repo.by_username("A(B", 500).await.unwrap()), vec![1]);
    }

    #[tokio::test]
    async fn test_metacharacter_username_matches_itself() {
        // "a$b" as a regex can never match, equality still does.
        let repo = MemoryPostRepository::new();
        repo.insert(row(1, "x", "a$b", at(10, 8)));
        assert_eq!(ids(&repo.by_username("A$B", 500).await.unwrap()), vec![1]);
    }

    #[tokio::test]
    async fn test_metrics_inputs_window_and_engagement() {
        let repo = MemoryPostRepository::new();
        let now = at(18, 12); // Sunday
        let mut engaged = row(1, "ig", "alice", now - Duration::days(1));
        engaged.likes = Some(40);
        engaged.comments = Some(10);
        engaged.followers = Some(1000);
        repo.insert(engaged);
        repo.insert(row(2, "ig", "alice", now - Duration::days(8)));
        repo.insert(row(3, "tk", "bob", now));

        let inputs = repo
            .metrics_inputs(now - Duration::days(7), now)
            .await
            .unwrap();
        assert_eq!(inputs.total_posts, 3);
        assert_eq!(inputs.distinct_profiles, 2);
        assert_eq!(inputs.avg_engagement, Some(5.0));
        assert_eq!(
            inputs.platform_counts,
            vec![("ig".to_string(), 2), ("tk".to_string(), 1)]
        );
        // Saturday (7) and Sunday (1); the 8-day-old post is outside the window.
        assert_eq!(inputs.weekday_counts, vec![(1, 1), (7, 1)]);
    }

    #[test]
    fn test_weekday_numbering_starts_on_sunday() {
        assert_eq!(weekday_number(at(18, 0)), 1); // Sunday
        assert_eq!(weekday_number(at(19, 0)), 2); // Monday
        assert_eq!(weekday_number(at(24, 0)), 7); // Saturday
    }
}
