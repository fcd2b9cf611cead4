mod analysis;
mod config;
mod db;
mod enrichment;
mod errors;
mod intake;
mod llm_client;
mod routes;
mod rubric;
mod session;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::enrichment::EnrichmentClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemorySessionStore;
use crate::store::postgres::PgSessionStore;
use crate::store::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("talentgate_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Talentgate API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the session store (backend chosen at deployment time)
    let store: Arc<dyn SessionStore> = match config.store_backend {
        StoreBackend::Memory => {
            info!("Session store: in-memory");
            Arc::new(MemorySessionStore::new())
        }
        StoreBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL is required when STORE_BACKEND=postgres")
            })?;
            let pool = create_pool(url).await?;
            let store = PgSessionStore::new(pool);
            store.ensure_schema().await?;
            info!("Session store: PostgreSQL");
            Arc::new(store)
        }
    };

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize the enrichment collector (GitHub / portfolio fetches)
    let enrichment = EnrichmentClient::new(config.github_token.clone());

    // Upload root must exist before the first session is created
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    info!("Upload directory: {}", config.upload_dir);

    // Build app state
    let state = AppState {
        store,
        llm,
        enrichment,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
