pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Field selection and questionnaires
        .route("/api/fields", get(session::handle_get_fields))
        .route(
            "/api/questionnaire/:field",
            get(session::handle_get_questionnaire),
        )
        // Session lifecycle
        .route("/api/session/create", post(session::handle_create_session))
        .route("/api/upload/:session_id", post(session::handle_upload))
        .route(
            "/api/session/:session_id/questionnaire",
            post(session::handle_submit_questionnaire),
        )
        .route(
            "/api/session/:session_id/status",
            get(session::handle_session_status),
        )
        .route(
            "/api/session/:session_id",
            delete(session::handle_delete_session),
        )
        // Analysis
        .route("/api/analyze/:session_id", post(analysis::handle_analyze))
        .route("/api/results/:session_id", get(analysis::handle_results))
        .with_state(state)
}
