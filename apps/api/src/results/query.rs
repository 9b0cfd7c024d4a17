use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::models::post::Post;
use crate::results::repository::{LatestFilter, PostRepository};

pub const DEFAULT_LATEST_LIMIT: i64 = 100;
pub const USER_HISTORY_CAP: i64 = 500;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Raw query string of `GET /results/latest`. Kept as strings so a malformed value
/// degrades to "no filter" instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestParams {
    pub since: Option<String>,
    pub platform: Option<String>,
    pub limit: Option<String>,
}

impl LatestParams {
    pub fn into_filter(self) -> LatestFilter {
        let since = self
            .since
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|raw| {
                let parsed = parse_since(raw);
                if parsed.is_none() {
                    warn!("Ignoring malformed 'since' filter: {raw:?}");
                }
                parsed
            });

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_LATEST_LIMIT,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => n,
                _ => {
                    warn!("Ignoring invalid 'limit': {raw:?}");
                    DEFAULT_LATEST_LIMIT
                }
            },
        };

        let platform = self
            .platform
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty());

        LatestFilter {
            platform,
            since,
            limit,
        }
    }
}

/// Parses a `since` timestamp. Naive values are read as UTC; a bare date means midnight.
pub fn parse_since(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `GET /results/latest`
pub async fn list_latest(
    repo: &dyn PostRepository,
    params: LatestParams,
) -> Result<Vec<Post>, AppError> {
    repo.latest(&params.into_filter()).await
}

/// Patterns that would match every username; they skip the regex engine entirely.
pub fn is_wildcard(pattern: &str) -> bool {
    matches!(pattern, "" | "*" | ".*")
}

/// `GET /results/user_history`: posts whose username matches `pattern`, newest first,
/// capped at 500.
pub async fn search_by_user(repo: &dyn PostRepository, pattern: &str) -> Result<Vec<Post>, AppError> {
    let pattern = pattern.trim();
    if is_wildcard(pattern) {
        let filter = LatestFilter {
            platform: None,
            since: None,
            limit: USER_HISTORY_CAP,
        };
        return repo.latest(&filter).await;
    }
    repo.by_username(pattern, USER_HISTORY_CAP).await
}
