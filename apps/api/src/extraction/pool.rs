use std::sync::Arc;

use tokio::runtime::Handle;

use crate::errors::AppError;
use crate::extraction::runner::{ScrapeJob, ScrapeRunner};

/// Runs scrape jobs detached from the request that submitted them.
///
/// Jobs get no handle, no completion signal and no retry. A job's error or panic
/// stays inside its own task.
#[derive(Debug, Clone, Default)]
pub struct TaskPool;

impl TaskPool {
    pub fn new() -> Self {
        Self
    }

    pub fn submit(&self, runner: Arc<dyn ScrapeRunner>, job: ScrapeJob) -> Result<(), AppError> {
        let handle = Handle::try_current()
            .map_err(|e| AppError::DispatchFailed(format!("no async runtime available: {e}")))?;

        handle.spawn(async move {
            // Runners log their own outcome.
            let _ = runner.run(job).await;
        });
        Ok(())
    }
}
