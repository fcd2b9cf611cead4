//! Session state owned by the store.
//!
//! A session walks the lifecycle
//! `created → documents_uploaded → questionnaire_completed → analyzing →
//! {completed | error}`; transitions are driven by the handlers, the store
//! just records them. Re-analysis overwrites the result (last write wins).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::analysis::models::AnalysisReport;
use crate::rubric::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    DocumentsUploaded,
    QuestionnaireCompleted,
    Analyzing,
    Completed,
    Error,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Created => "created",
            SessionStatus::DocumentsUploaded => "documents_uploaded",
            SessionStatus::QuestionnaireCompleted => "questionnaire_completed",
            SessionStatus::Analyzing => "analyzing",
            SessionStatus::Completed => "completed",
            SessionStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<SessionStatus> {
        match s {
            "created" => Some(SessionStatus::Created),
            "documents_uploaded" => Some(SessionStatus::DocumentsUploaded),
            "questionnaire_completed" => Some(SessionStatus::QuestionnaireCompleted),
            "analyzing" => Some(SessionStatus::Analyzing),
            "completed" => Some(SessionStatus::Completed),
            "error" => Some(SessionStatus::Error),
            _ => None,
        }
    }
}

/// Metadata for one uploaded file. Created once at upload time and
/// immutable thereafter; the document body lives on disk at `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub filename: String,
    pub path: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub field: Field,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub documents: Vec<StoredDocument>,
    pub questionnaire_responses: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(field: Field) -> Self {
        Session {
            session_id: new_session_id(),
            field,
            created_at: Utc::now(),
            status: SessionStatus::Created,
            documents: Vec::new(),
            questionnaire_responses: Map::new(),
            result: None,
            error: None,
            completed_at: None,
        }
    }
}

/// Opaque session token: timestamp for operator readability plus a random
/// suffix for uniqueness.
fn new_session_id() -> String {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{stamp}_{}", &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_in_created_state() {
        let session = Session::new(Field::ArtsCulture);
        assert_eq!(session.status, SessionStatus::Created);
        assert!(session.documents.is_empty());
        assert!(session.questionnaire_responses.is_empty());
        assert!(session.result.is_none());
    }

    #[test]
    fn test_session_ids_are_unique_and_prefixed() {
        let a = Session::new(Field::DigitalTechnology);
        let b = Session::new(Field::DigitalTechnology);
        assert!(a.session_id.starts_with("session_"));
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&SessionStatus::DocumentsUploaded).unwrap();
        assert_eq!(json, "\"documents_uploaded\"");
        let back: SessionStatus = serde_json::from_str("\"questionnaire_completed\"").unwrap();
        assert_eq!(back, SessionStatus::QuestionnaireCompleted);
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            SessionStatus::Created,
            SessionStatus::DocumentsUploaded,
            SessionStatus::QuestionnaireCompleted,
            SessionStatus::Analyzing,
            SessionStatus::Completed,
            SessionStatus::Error,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("nonsense"), None);
    }

    #[test]
    fn test_session_serializes_without_empty_optionals() {
        let session = Session::new(Field::ScienceResearch);
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("result").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["status"], "created");
        assert_eq!(json["field"], "science_research");
    }
}
