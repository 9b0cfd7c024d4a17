use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

pub const DEFAULT_SENTIMENT: &str = "neutral";

/// Raw `scrape_results` row as written by the scraping routines.
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct ScrapeResultRow {
    pub id: i64,
    pub platform: String,
    pub username: String,
    pub description: Option<String>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub followers: Option<i64>,
    pub post_date: Option<String>,
    pub sentiment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A stored post with every optional column resolved to its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub username: String,
    pub platform: String,
    pub description: String,
    pub likes: i64,
    pub comments: i64,
    #[serde(skip)]
    pub followers: i64,
    pub post_date: String,
    pub sentiment: String,
    #[serde(serialize_with = "serialize_minute")]
    pub created_at: DateTime<Utc>,
}

impl From<ScrapeResultRow> for Post {
    fn from(row: ScrapeResultRow) -> Self {
        Post {
            id: row.id,
            username: row.username,
            platform: row.platform,
            description: row.description.unwrap_or_default(),
            likes: row.likes.unwrap_or(0),
            comments: row.comments.unwrap_or(0),
            followers: row.followers.unwrap_or(0),
            post_date: row.post_date.unwrap_or_default(),
            sentiment: row
                .sentiment
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SENTIMENT.to_string()),
            created_at: row.created_at,
        }
    }
}

fn serialize_minute<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.format("%Y-%m-%d %H:%M").to_string())
}
