//! Scrape runners — the binding between a platform and its scrape routine.
//!
//! The routines themselves live outside this service. `CommandRunner` launches the
//! program configured for a platform and writes the job to its stdin as JSON.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ScraperCommands;
use crate::extraction::credentials::ResolvedCredentials;
use crate::models::platform::Platform;

/// Everything a scrape routine receives. Fully owned: a snapshot taken at dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeJob {
    pub job_id: Uuid,
    pub platform: Platform,
    pub targets: Vec<String>,
    #[serde(flatten)]
    pub credentials: ResolvedCredentials,
}

#[async_trait]
pub trait ScrapeRunner: Send + Sync {
    async fn run(&self, job: ScrapeJob) -> Result<()>;
}

// ────────────────────────────────────────────────────────────────────────────
// CommandRunner
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a configured command line into program and arguments using shell quoting
    /// rules, so paths with spaces can be quoted. No shell is involved at launch.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = shell_words::split(line)
            .with_context(|| format!("invalid scraper command '{line}'"))?
            .into_iter();
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("scraper command is empty"))?;
        Ok(Self::new(program, parts.collect()))
    }

    async fn launch(&self, job: &ScrapeJob) -> Result<()> {
        let payload = serde_json::to_vec(job).context("failed to encode job payload")?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to launch scraper '{}'", self.program))?;
        info!(
            "Scrape job {} started: {} via '{}' ({} targets)",
            job.job_id,
            job.platform,
            self.program,
            job.targets.len()
        );

        if let Some(mut stdin) = child.stdin.take() {
            // A routine that exits without reading its input is judged by its exit status.
            if let Err(e) = stdin.write_all(&payload).await {
                warn!("Scrape job {}: could not write job payload: {e}", job.job_id);
            }
            drop(stdin);
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("failed waiting for scraper '{}'", self.program))?;
        if !status.success() {
            return Err(anyhow!("scraper '{}' exited with {status}", self.program));
        }
        Ok(())
    }
}

/// Nobody awaits a job's result, so every outcome is logged here.
#[async_trait]
impl ScrapeRunner for CommandRunner {
    async fn run(&self, job: ScrapeJob) -> Result<()> {
        match self.launch(&job).await {
            Ok(()) => {
                info!("Scrape job {} finished", job.job_id);
                Ok(())
            }
            Err(e) => {
                error!("Scrape job {} ({}) failed: {e:#}", job.job_id, job.platform);
                Err(e)
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// Runner per platform. A platform with no entry cannot be dispatched.
#[derive(Clone, Default)]
pub struct RunnerRegistry {
    runners: HashMap<Platform, Arc<dyn ScrapeRunner>>,
}

impl RunnerRegistry {
    pub fn from_commands(commands: &ScraperCommands) -> Self {
        let mut registry = Self::default();
        for platform in Platform::ALL {
            let Some(line) = commands.for_platform(platform) else {
                warn!("No scraper command configured for {platform}");
                continue;
            };
            match CommandRunner::from_command_line(line) {
                Ok(runner) => registry = registry.with(platform, Arc::new(runner)),
                Err(e) => warn!("Scraper command for {platform} ignored: {e:#}"),
            }
        }
        registry
    }

    pub fn with(mut self, platform: Platform, runner: Arc<dyn ScrapeRunner>) -> Self {
        self.runners.insert(platform, runner);
        self
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn ScrapeRunner>> {
        self.runners.get(&platform).cloned()
    }
}
