mod config;
mod db;
mod errors;
mod extraction;
mod keys;
mod models;
mod results;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::dispatcher::Dispatcher;
use crate::extraction::pool::TaskPool;
use crate::extraction::runner::RunnerRegistry;
use crate::keys::store::{CredentialStore, PgCredentialStore};
use crate::results::repository::PgPostRepository;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scrapeboard v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (migrations included)
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Scrape routines are external programs, one per platform
    let runners = RunnerRegistry::from_commands(&config.scraper_commands);

    let keys: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(db.clone()));
    let dispatcher = Dispatcher::new(keys.clone(), runners, TaskPool::new());

    let state = AppState {
        keys,
        posts: Arc::new(PgPostRepository::new(db)),
        dispatcher: Arc::new(dispatcher),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
