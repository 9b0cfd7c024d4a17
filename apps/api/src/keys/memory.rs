//! In-memory `CredentialStore` for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::keys::store::CredentialStore;
use crate::models::keys::{KeyPoolSummary, ScraperKeyRow};
use crate::models::platform::{Platform, Purpose};

#[derive(Default)]
pub struct MemoryCredentialStore {
    rows: Mutex<Vec<ScraperKeyRow>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row ever written, active or not.
    pub fn snapshot(&self) -> Vec<ScraperKeyRow> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    fn with_rows<T>(&self, f: impl FnOnce(&mut Vec<ScraperKeyRow>) -> T) -> Result<T, AppError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| AppError::Storage("credential store lock poisoned".to_string()))?;
        Ok(f(&mut rows))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn list_active(
        &self,
        platform: Platform,
        purpose: Option<Purpose>,
    ) -> Result<Vec<String>, AppError> {
        self.with_rows(|rows| {
            rows.iter()
                .filter(|r| r.is_active && r.platform == platform.as_str())
                .filter(|r| purpose.map_or(true, |p| r.purpose == p.as_str()))
                .map(|r| r.key_value.clone())
                .collect()
        })
    }

    async fn deactivate_all(&self, platform: Platform, purpose: Purpose) -> Result<u64, AppError> {
        self.with_rows(|rows| {
            let mut touched = 0;
            for row in rows.iter_mut().filter(|r| {
                r.is_active && r.platform == platform.as_str() && r.purpose == purpose.as_str()
            }) {
                row.is_active = false;
                touched += 1;
            }
            touched
        })
    }

    async fn insert(
        &self,
        platform: Platform,
        purpose: Purpose,
        key_value: &str,
    ) -> Result<(), AppError> {
        self.with_rows(|rows| {
            let id = rows.len() as i64 + 1;
            rows.push(ScraperKeyRow {
                id,
                platform: platform.as_str().to_string(),
                purpose: purpose.as_str().to_string(),
                key_value: key_value.to_string(),
                is_active: true,
                created_at: Utc::now(),
            });
        })
    }

    async fn active_summary(&self) -> Result<Vec<KeyPoolSummary>, AppError> {
        let mut summary: Vec<KeyPoolSummary> = Vec::new();
        for row in self.snapshot().into_iter().filter(|r| r.is_active) {
            let (Ok(platform), Ok(purpose)) = (
                row.platform.parse::<Platform>(),
                row.purpose.parse::<Purpose>(),
            ) else {
                continue;
            };
            match summary
                .iter_mut()
                .find(|s| s.platform == platform && s.purpose == purpose)
            {
                Some(s) => s.active += 1,
                None => summary.push(KeyPoolSummary {
                    platform,
                    purpose,
                    active: 1,
                }),
            }
        }
        summary.sort_by_key(|s| (s.platform, s.purpose));
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_purpose_filter_is_optional() {
        let store = MemoryCredentialStore::new();
        store.insert(Platform::Tk, Purpose::Search, "s1").await.unwrap();
        store.insert(Platform::Tk, Purpose::Posts, "p1").await.unwrap();
        store.insert(Platform::X, Purpose::Posts, "xp").await.unwrap();

        let all = store.list_active(Platform::Tk, None).await.unwrap();
        assert_eq!(all, vec!["s1", "p1"]);

        let posts = store
            .list_active(Platform::Tk, Some(Purpose::Posts))
            .await
            .unwrap();
        assert_eq!(posts, vec!["p1"]);
    }

    #[tokio::test]
    async fn test_deactivate_only_touches_the_pair() {
        let store = MemoryCredentialStore::new();
        store.insert(Platform::X, Purpose::Search, "a").await.unwrap();
        store.insert(Platform::X, Purpose::Search, "b").await.unwrap();
        store.insert(Platform::X, Purpose::Posts, "c").await.unwrap();

        let touched = store.deactivate_all(Platform::X, Purpose::Search).await.unwrap();
        assert_eq!(touched, 2);
        assert!(store
            .list_active(Platform::X, Some(Purpose::Search))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            store.list_active(Platform::X, Some(Purpose::Posts)).await.unwrap(),
            vec!["c"]
        );
        // Deactivation never removes rows
        assert_eq!(store.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_active_summary_counts_pools() {
        let store = MemoryCredentialStore::new();
        store.insert(Platform::X, Purpose::Posts, "a").await.unwrap();
        store.insert(Platform::Ig, Purpose::Search, "b").await.unwrap();
        store.insert(Platform::Ig, Purpose::Search, "c").await.unwrap();
        store.deactivate_all(Platform::X, Purpose::Posts).await.unwrap();

        let summary = store.active_summary().await.unwrap();
        assert_eq!(
            summary,
            vec![KeyPoolSummary {
                platform: Platform::Ig,
                purpose: Purpose::Search,
                active: 2,
            }]
        );
    }

    #[tokio::test]
    async fn test_active_summary_orders_search_before_posts() {
        let store = MemoryCredentialStore::new();
        store.insert(Platform::Tk, Purpose::Posts, "p").await.unwrap();
        store.insert(Platform::Tk, Purpose::Search, "s").await.unwrap();

        let purposes: Vec<Purpose> = store
            .active_summary()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.purpose)
            .collect();
        assert_eq!(purposes, vec![Purpose::Search, Purpose::Posts]);
    }
}
