//! Analysis endpoints: trigger a background pipeline run and serve results.

use std::path::PathBuf;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::analysis::orchestrator::analyze_application;
use crate::errors::AppError;
use crate::session::handlers::load_session;
use crate::session::models::{Session, SessionStatus};
use crate::state::AppState;
use crate::store::SessionUpdate;

/// POST /api/analyze/:session_id
///
/// Validates preconditions synchronously (before any LLM spend), flips the
/// session to `analyzing`, and runs the pipeline on a background task so
/// this request returns immediately.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = load_session(&state, &session_id).await?;

    if session.documents.is_empty() {
        return Err(AppError::Precondition("No documents uploaded".to_string()));
    }
    if session.questionnaire_responses.is_empty() {
        return Err(AppError::Precondition(
            "Questionnaire not completed".to_string(),
        ));
    }

    state
        .store
        .update(
            &session_id,
            SessionUpdate {
                status: Some(SessionStatus::Analyzing),
                ..Default::default()
            },
        )
        .await
        .map_err(AppError::Internal)?;

    tokio::spawn(run_analysis_task(state, session));

    Ok(Json(json!({
        "session_id": session_id,
        "status": SessionStatus::Analyzing,
        "message": "Analysis started in background",
    })))
}

/// Background unit of work for one session. The pipeline degrades
/// internally; an error here means a precondition or I/O fault, which is
/// recorded on the session instead of being lost with the task.
async fn run_analysis_task(state: AppState, session: Session) {
    let session_id = session.session_id.clone();
    let document_paths: Vec<PathBuf> = session
        .documents
        .iter()
        .map(|d| PathBuf::from(&d.path))
        .collect();

    let outcome = analyze_application(
        state.llm.as_ref(),
        &state.enrichment,
        session.field,
        &document_paths,
        &session.questionnaire_responses,
    )
    .await;

    let update = match outcome {
        Ok(report) => {
            info!(
                "Session {session_id}: analysis completed (likelihood {:.2})",
                report.analysis.likelihood
            );
            SessionUpdate {
                status: Some(SessionStatus::Completed),
                result: Some(report),
                completed_at: Some(Utc::now()),
                ..Default::default()
            }
        }
        Err(e) => {
            error!("Session {session_id}: analysis failed: {e}");
            SessionUpdate {
                status: Some(SessionStatus::Error),
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    };

    if let Err(e) = state.store.update(&session_id, update).await {
        error!("Session {session_id}: failed to persist analysis outcome: {e:#}");
    }
}

/// GET /api/results/:session_id
///
/// Serves the persisted report verbatim once analysis has completed;
/// before that, a status envelope for polling callers.
pub async fn handle_results(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = load_session(&state, &session_id).await?;

    if session.status != SessionStatus::Completed {
        return Ok(Json(json!({
            "session_id": session_id,
            "status": session.status,
            "message": format!(
                "Analysis not yet completed. Current status: {}",
                session.status.as_str()
            ),
        })));
    }

    Ok(Json(json!({
        "session_id": session_id,
        "status": SessionStatus::Completed,
        "results": session.result,
    })))
}
