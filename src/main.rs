mod agent;
mod config;
mod errors;
mod models;
mod routes;
mod service;
mod session;
mod telemetry;

use std::sync::Arc;

use tracing::info;

use crate::agent::OllamaAgentService;
use crate::config::Config;
use crate::routes::api_routes::router;
use crate::service::chat_service::ChatService;
use crate::session::store::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightlog_chat=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let agent = OllamaAgentService::new(&config.ollama_base_url, &config.model)?;
    let sessions = SessionStore::new(config.max_sessions, config.session_ttl);
    let chat_service = ChatService::new(sessions, Arc::new(agent), config.max_message_length);
    info!(
        "Using model {} at {} (max {} sessions, idle ttl {}s)",
        config.model,
        config.ollama_base_url,
        config.max_sessions,
        config.session_ttl.num_seconds()
    );

    let app = router(chat_service);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
