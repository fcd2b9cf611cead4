//! In-memory session store: a map behind an async RwLock.
//!
//! The default backend for development and single-node deployments.
//! Sessions do not survive process restart.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::session::models::Session;
use crate::store::{SessionStore, SessionUpdate};

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn update(&self, session_id: &str, update: SessionUpdate) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                update.apply(session);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        Ok(self.sessions.write().await.remove(session_id).is_some())
    }
}
