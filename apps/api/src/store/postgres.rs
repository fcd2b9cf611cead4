//! Postgres-backed session store.
//!
//! One `sessions` table; documents, questionnaire answers, and the final
//! report are JSONB payloads. Writes are whole-row replacements, matching
//! the store's last-write-wins contract.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::analysis::models::AnalysisReport;
use crate::rubric::Field;
use crate::session::models::{Session, SessionStatus, StoredDocument};
use crate::store::{SessionStore, SessionUpdate};

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the sessions table when absent. Run once at startup.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                field TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                status TEXT NOT NULL,
                documents JSONB NOT NULL DEFAULT '[]',
                questionnaire_responses JSONB NOT NULL DEFAULT '{}',
                result JSONB,
                error TEXT,
                completed_at TIMESTAMPTZ
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        info!("sessions table ready");
        Ok(())
    }

    /// Whole-row write, inserting or replacing.
    async fn save(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions
                (session_id, field, created_at, status, documents,
                 questionnaire_responses, result, error, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (session_id) DO UPDATE SET
                status = EXCLUDED.status,
                documents = EXCLUDED.documents,
                questionnaire_responses = EXCLUDED.questionnaire_responses,
                result = EXCLUDED.result,
                error = EXCLUDED.error,
                completed_at = EXCLUDED.completed_at
            "#,
        )
        .bind(&session.session_id)
        .bind(session.field.as_str())
        .bind(session.created_at)
        .bind(session.status.as_str())
        .bind(Json(&session.documents))
        .bind(Json(&session.questionnaire_responses))
        .bind(session.result.as_ref().map(Json))
        .bind(&session.error)
        .bind(session.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: String,
    field: String,
    created_at: DateTime<Utc>,
    status: String,
    documents: Json<Vec<StoredDocument>>,
    questionnaire_responses: Json<Map<String, Value>>,
    result: Option<Json<AnalysisReport>>,
    error: Option<String>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    fn into_session(self) -> Result<Session> {
        let field = Field::parse(&self.field)
            .ok_or_else(|| anyhow!("unknown field '{}' in sessions table", self.field))?;
        let status = SessionStatus::parse(&self.status)
            .ok_or_else(|| anyhow!("unknown status '{}' in sessions table", self.status))?;
        Ok(Session {
            session_id: self.session_id,
            field,
            created_at: self.created_at,
            status,
            documents: self.documents.0,
            questionnaire_responses: self.questionnaire_responses.0,
            result: self.result.map(|r| r.0),
            error: self.error,
            completed_at: self.completed_at,
        })
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: Session) -> Result<()> {
        self.save(&session).await
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        let row: Option<SessionRow> =
            sqlx::query_as("SELECT * FROM sessions WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(SessionRow::into_session).transpose()
    }

    async fn update(&self, session_id: &str, update: SessionUpdate) -> Result<bool> {
        // Read-modify-write: the contract is a single replace-style write,
        // not field-level merging in SQL.
        let Some(mut session) = self.get(session_id).await? else {
            return Ok(false);
        };
        update.apply(&mut session);
        self.save(&session).await?;
        Ok(true)
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
