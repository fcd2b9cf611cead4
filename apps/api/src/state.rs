use std::sync::Arc;

use crate::config::Config;
use crate::enrichment::EnrichmentClient;
use crate::llm_client::ChatModel;
use crate::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The store and LLM handles are trait objects constructed once at startup,
/// so handlers and the pipeline never touch a concrete backend directly.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub llm: Arc<dyn ChatModel>,
    pub enrichment: EnrichmentClient,
    pub config: Config,
}
