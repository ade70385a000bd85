mod account;
mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod onboarding;
mod preparation;
mod records;
mod reference;
mod routes;
mod state;
mod timeline;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::notifier::LogResetNotifier;
use crate::config::{Config, PrepareBackend};
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::preparation::generator::{GuideGenerator, LlmGuideGenerator, RemoteGuideGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Anchor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize LLM client (optional without an API key)
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; direct guide function disabled");
            None
        }
    };

    // Initialize guide generator (remote by default; swap via PREPARE_BACKEND)
    let guides: Arc<dyn GuideGenerator> = match (config.prepare_backend, llm.clone()) {
        (PrepareBackend::Llm, Some(client)) => Arc::new(LlmGuideGenerator::new(client)),
        _ => Arc::new(RemoteGuideGenerator::new(&config.prepare_api_url)?),
    };
    info!(backend = guides.backend(), "Guide generator initialized");

    // Build app state
    let state = AppState {
        db,
        llm,
        guides,
        reset_notifier: Arc::new(LogResetNotifier),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the deployed web client

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
