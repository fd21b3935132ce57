//! In-memory SessionRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tactics_core::SessionSnapshot;

use super::traits::validate_session_id;
use super::{RepositoryError, Result, SessionRepository};

#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<BTreeMap<String, SessionSnapshot>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn save(&self, session_id: &str, snapshot: &SessionSnapshot) -> Result<()> {
        validate_session_id(session_id)?;
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        sessions.insert(session_id.to_string(), snapshot.clone());
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(sessions.get(session_id).cloned())
    }

    fn exists(&self, session_id: &str) -> bool {
        self.sessions
            .read()
            .map(|sessions| sessions.contains_key(session_id))
            .unwrap_or(false)
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        sessions.remove(session_id);
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(sessions.keys().cloned().collect())
    }
}
