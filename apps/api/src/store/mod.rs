//! Abstract session store.
//!
//! The pipeline and handlers depend only on this trait; the backing
//! implementation (process memory or Postgres) is chosen once at startup.
//! Updates are partial on the wire but applied as a single replace-style
//! write per session, so concurrent re-analysis is last-write-wins.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::analysis::models::AnalysisReport;
use crate::session::models::{Session, SessionStatus, StoredDocument};

/// A partial session update. Unset fields are left untouched;
/// `push_documents` appends rather than replaces.
#[derive(Debug, Default)]
pub struct SessionUpdate {
    pub status: Option<SessionStatus>,
    pub push_documents: Vec<StoredDocument>,
    pub questionnaire_responses: Option<Map<String, Value>>,
    pub result: Option<AnalysisReport>,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionUpdate {
    /// Folds this update into a session snapshot.
    pub fn apply(self, session: &mut Session) {
        if let Some(status) = self.status {
            session.status = status;
        }
        session.documents.extend(self.push_documents);
        if let Some(responses) = self.questionnaire_responses {
            session.questionnaire_responses = responses;
        }
        if let Some(result) = self.result {
            session.result = Some(result);
        }
        if let Some(error) = self.error {
            session.error = Some(error);
        }
        if let Some(completed_at) = self.completed_at {
            session.completed_at = Some(completed_at);
        }
    }
}

/// Keyed session persistence. Carried in `AppState` as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: Session) -> Result<()>;

    async fn get(&self, session_id: &str) -> Result<Option<Session>>;

    /// Applies a partial update. Returns false when the session is unknown.
    async fn update(&self, session_id: &str, update: SessionUpdate) -> Result<bool>;

    /// Returns false when the session was already absent.
    async fn delete(&self, session_id: &str) -> Result<bool>;
}
