//! Session Store: pluggable registry of interview sessions.
//!
//! Default: `InMemorySessionStore` (process-lifetime only, nothing persisted).
//! The orchestrator holds an `Arc<dyn SessionStore>`, so a shared cache can be
//! swapped in without touching interview logic.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::interview::models::{Session, SessionId, SessionInit};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),
}

/// In-place mutation applied atomically by `SessionStore::update`.
pub type SessionMutator = Box<dyn FnOnce(&mut Session) + Send>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Registers a new session and returns its freshly minted id.
    async fn create(&self, init: SessionInit) -> Result<SessionId, StoreError>;

    /// Returns a snapshot of the session.
    async fn get(&self, id: SessionId) -> Result<Session, StoreError>;

    /// Applies `mutator` to the stored session and returns the result.
    async fn update(&self, id: SessionId, mutator: SessionMutator)
        -> Result<Session, StoreError>;
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, init: SessionInit) -> Result<SessionId, StoreError> {
        let mut sessions = self.sessions.write().await;

        let mut id = Uuid::new_v4();
        while sessions.contains_key(&id) {
            id = Uuid::new_v4();
        }

        sessions.insert(id, Session::new(id, init));
        debug!("Session {id} created ({} live)", sessions.len());
        Ok(id)
    }

    async fn get(&self, id: SessionId) -> Result<Session, StoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(
        &self,
        id: SessionId,
        mutator: SessionMutator,
    ) -> Result<Session, StoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        mutator(session);
        Ok(session.clone())
    }
}
