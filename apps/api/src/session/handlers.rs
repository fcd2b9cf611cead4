use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::rubric::{questionnaire, Field};
use crate::session::models::{Session, SessionStatus, StoredDocument};
use crate::state::AppState;
use crate::store::SessionUpdate;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// GET /api/fields
pub async fn handle_get_fields() -> Json<Value> {
    let fields: Vec<Value> = Field::ALL
        .iter()
        .map(|f| json!({"id": f.as_str(), "name": f.display_name()}))
        .collect();
    Json(json!({ "fields": fields }))
}

/// GET /api/questionnaire/:field
pub async fn handle_get_questionnaire(
    Path(field): Path<String>,
) -> Result<Json<Value>, AppError> {
    let field = parse_field(&field)?;
    Ok(Json(json!({
        "field": field.as_str(),
        "field_name": field.display_name(),
        "questions": questionnaire::questionnaire_for(field),
    })))
}

#[derive(Debug, Deserialize)]
pub struct FieldSelection {
    pub field: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub field: &'static str,
    pub field_name: &'static str,
}

/// POST /api/session/create
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(selection): Json<FieldSelection>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let field = parse_field(&selection.field)?;
    let session = Session::new(field);
    let session_id = session.session_id.clone();

    state.store.create(session).await.map_err(AppError::Internal)?;

    tokio::fs::create_dir_all(session_dir(&state, &session_id))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload dir: {e}")))?;

    info!("Created session {session_id} for field {}", field.as_str());

    Ok(Json(CreateSessionResponse {
        session_id,
        field: field.as_str(),
        field_name: field.display_name(),
    }))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub uploaded_files: usize,
    pub total_documents: usize,
    pub files: Vec<String>,
}

/// POST /api/upload/:session_id
///
/// Accepts multipart file parts; only PDF and DOCX are allowed. Files land
/// under the session's upload directory and their metadata is appended to
/// the session.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let session = load_session(&state, &session_id).await?;

    let dir = session_dir(&state, &session_id);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload dir: {e}")))?;

    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue; // non-file form field
        };

        let filename = sanitize_filename(&original_name);
        if !has_allowed_extension(&filename) {
            return Err(AppError::Validation(format!(
                "Only PDF or DOCX files allowed: {original_name}"
            )));
        }

        let bytes: bytes::Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read {original_name}: {e}")))?;

        let path = dir.join(&filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to save {filename}: {e}")))?;

        uploaded.push(StoredDocument {
            filename,
            path: path.to_string_lossy().into_owned(),
            size: bytes.len() as u64,
            uploaded_at: Utc::now(),
        });
    }

    if uploaded.is_empty() {
        return Err(AppError::Validation(
            "No files found in upload request".to_string(),
        ));
    }

    let files: Vec<String> = uploaded.iter().map(|d| d.filename.clone()).collect();
    let uploaded_count = uploaded.len();
    let total_documents = session.documents.len() + uploaded_count;

    state
        .store
        .update(
            &session_id,
            SessionUpdate {
                status: Some(SessionStatus::DocumentsUploaded),
                push_documents: uploaded,
                ..Default::default()
            },
        )
        .await
        .map_err(AppError::Internal)?;

    info!("Session {session_id}: stored {uploaded_count} documents");

    Ok(Json(UploadResponse {
        session_id,
        uploaded_files: uploaded_count,
        total_documents,
        files,
    }))
}

/// POST /api/session/:session_id/questionnaire
pub async fn handle_submit_questionnaire(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(responses): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let responses_saved = responses.len();
    let updated = state
        .store
        .update(
            &session_id,
            SessionUpdate {
                status: Some(SessionStatus::QuestionnaireCompleted),
                questionnaire_responses: Some(responses),
                ..Default::default()
            },
        )
        .await
        .map_err(AppError::Internal)?;

    if !updated {
        return Err(AppError::NotFound(format!("Session {session_id} not found")));
    }

    Ok(Json(json!({
        "session_id": session_id,
        "status": "success",
        "responses_saved": responses_saved,
    })))
}

/// GET /api/session/:session_id/status
pub async fn handle_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = load_session(&state, &session_id).await?;

    Ok(Json(json!({
        "session_id": session.session_id,
        "status": session.status,
        "field": session.field,
        "created_at": session.created_at,
        "documents_count": session.documents.len(),
        "has_questionnaire": !session.questionnaire_responses.is_empty(),
    })))
}

/// DELETE /api/session/:session_id
///
/// Removes the session row and its upload directory. File cleanup is best
/// effort: a session missing from the store does not block removing files.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let dir = session_dir(&state, &session_id);
    if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove upload dir {}: {e}", dir.display());
        }
    }

    let removed = state
        .store
        .delete(&session_id)
        .await
        .map_err(AppError::Internal)?;
    if !removed {
        warn!("Session {session_id} was not in the store, files cleaned up anyway");
    }

    Ok(Json(json!({
        "status": "success",
        "message": format!("Session {session_id} deleted successfully"),
    })))
}

pub(crate) async fn load_session(
    state: &AppState,
    session_id: &str,
) -> Result<Session, AppError> {
    state
        .store
        .get(session_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

pub(crate) fn session_dir(state: &AppState, session_id: &str) -> PathBuf {
    PathBuf::from(&state.config.upload_dir).join(session_id)
}

fn parse_field(field: &str) -> Result<Field, AppError> {
    Field::parse(field)
        .ok_or_else(|| AppError::Validation(format!("Invalid field '{field}'")))
}

/// Strips any path components a client smuggles into the filename.
fn sanitize_filename(name: &str) -> String {
    FsPath::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

fn has_allowed_extension(filename: &str) -> bool {
    FsPath::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions_are_case_insensitive() {
        assert!(has_allowed_extension("cv.pdf"));
        assert!(has_allowed_extension("CV.PDF"));
        assert!(has_allowed_extension("letter.docx"));
        assert!(!has_allowed_extension("notes.txt"));
        assert!(!has_allowed_extension("no_extension"));
    }

    #[test]
    fn test_sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_filename("cv.pdf"), "cv.pdf");
    }

    #[test]
    fn test_parse_field_rejects_unknown() {
        assert!(parse_field("digital_technology").is_ok());
        assert!(matches!(
            parse_field("astrology"),
            Err(AppError::Validation(_))
        ));
    }
}
