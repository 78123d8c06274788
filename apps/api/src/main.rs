mod advice;
mod completion;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::advice::sections::MarkerSet;
use crate::completion::{
    CompletionStateStore, DocumentStore, InMemoryDocumentStore, NoopDocumentStore,
    PgDocumentStore, RedisDocumentStore,
};
use crate::config::{CompletionBackend, Config};
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionRegistry;
use crate::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

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

    info!("Starting Advisor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion persistence
    let documents = build_document_store(&config.completion_backend).await?;
    info!("Completion store initialized (backend: {})", documents.backend_name());

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_api_key.clone(), config.llm_base_url.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Session registry with idle eviction
    let sessions = Arc::new(SessionRegistry::new(chrono::Duration::seconds(
        config.session_idle_ttl_secs,
    )));
    tokio::spawn(sessions.clone().run_sweeper(SESSION_SWEEP_INTERVAL));
    info!(
        "Session registry initialized (idle TTL: {}s)",
        config.session_idle_ttl_secs
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        completion: CompletionStateStore::new(documents),
        sessions,
        markers: Arc::new(MarkerSet::default()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the UI origin once it has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the `DocumentStore` backend named by `COMPLETION_STORE`.
async fn build_document_store(backend: &CompletionBackend) -> Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match backend {
        CompletionBackend::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgDocumentStore::new(pool))
        }
        CompletionBackend::Redis { redis_url } => {
            let client = redis::Client::open(redis_url.as_str())?;
            info!("Redis client initialized");
            Arc::new(RedisDocumentStore::new(client))
        }
        CompletionBackend::Memory => Arc::new(InMemoryDocumentStore::default()),
        CompletionBackend::None => Arc::new(NoopDocumentStore),
    };
    Ok(store)
}
