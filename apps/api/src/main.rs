mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod profile;
mod quiz;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::profile::sink::PgProfileSink;
use crate::quiz::store::SessionStore;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing secrets)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RIASEC API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (profile store)
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.generation_timeout)?;
    info!(
        "LLM client initialized (model: {}, timeout: {:?})",
        llm_client::MODEL,
        config.generation_timeout
    );

    let sessions = Arc::new(SessionStore::new());
    spawn_session_pruner(Arc::clone(&sessions), config.session_idle_timeout);

    // Build app state
    let state = AppState {
        sessions,
        llm: Arc::new(llm),
        profiles: Arc::new(PgProfileSink::new(db)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops quiz sessions nobody has touched for `max_idle`.
fn spawn_session_pruner(sessions: Arc<SessionStore>, max_idle: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            if sessions.prune_idle(max_idle).await > 0 {
                debug!("{} quiz sessions still live", sessions.len().await);
            }
        }
    });
}
