use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::credentials::resolve_credentials;
use crate::extraction::pool::TaskPool;
use crate::extraction::runner::{RunnerRegistry, ScrapeJob};
use crate::keys::store::CredentialStore;
use crate::models::platform::Platform;

/// Returned as soon as a scrape job has been handed to the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReceipt {
    pub status: &'static str,
    pub platform: Platform,
    pub started_at: DateTime<Utc>,
}

pub struct Dispatcher {
    keys: Arc<dyn CredentialStore>,
    runners: RunnerRegistry,
    pool: TaskPool,
}

impl Dispatcher {
    pub fn new(keys: Arc<dyn CredentialStore>, runners: RunnerRegistry, pool: TaskPool) -> Self {
        Self {
            keys,
            runners,
            pool,
        }
    }

    /// Validates the request, resolves the platform's active key pools and starts one
    /// detached scrape job. `started_at` is the time the request was received.
    pub async fn trigger(
        &self,
        platform: Option<&str>,
        targets: Vec<String>,
    ) -> Result<DispatchReceipt, AppError> {
        let started_at = Utc::now();

        let code = platform.map(str::trim).filter(|p| !p.is_empty());
        let code = match code {
            Some(code) if !targets.is_empty() => code,
            _ => {
                return Err(AppError::MissingParameter(
                    "platform and targets are required".to_string(),
                ))
            }
        };
        let platform: Platform = code
            .parse()
            .map_err(|e| AppError::Validation(format!("{e}")))?;

        let credentials = resolve_credentials(self.keys.as_ref(), platform).await?;

        let runner = self.runners.get(platform).ok_or_else(|| {
            AppError::DispatchFailed(format!("no scraper configured for platform '{platform}'"))
        })?;

        let job = ScrapeJob {
            job_id: Uuid::new_v4(),
            platform,
            targets,
            credentials,
        };
        let job_id = job.job_id;
        let target_count = job.targets.len();
        self.pool.submit(runner, job)?;

        info!("Dispatched scrape job {job_id} for {platform} ({target_count} targets)");

        Ok(DispatchReceipt {
            status: "started",
            platform,
            started_at,
        })
    }
}
