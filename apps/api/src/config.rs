use anyhow::{Context, Result};

use crate::models::platform::Platform;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub scraper_commands: ScraperCommands,
}

/// External program launched for each platform's scrape routine.
/// A platform without a command cannot be dispatched.
#[derive(Debug, Clone, Default)]
pub struct ScraperCommands {
    pub ig: Option<String>,
    pub tk: Option<String>,
    pub x: Option<String>,
}

impl ScraperCommands {
    pub fn for_platform(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Ig => self.ig.as_deref(),
            Platform::Tk => self.tk.as_deref(),
            Platform::X => self.x.as_deref(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scraper_commands: ScraperCommands {
                ig: optional_env("SCRAPER_IG_CMD"),
                tk: optional_env("SCRAPER_TK_CMD"),
                x: optional_env("SCRAPER_X_CMD"),
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
