//! Repository contract for saving and loading encounter sessions.

use tactics_core::SessionSnapshot;

use super::error::Result;

/// Persistence for [`SessionSnapshot`]s keyed by session id.
///
/// Session ids are restricted to ASCII alphanumerics, `-` and `_` so they
/// can be used as file name components.
pub trait SessionRepository: Send + Sync {
    fn save(&self, session_id: &str, snapshot: &SessionSnapshot) -> Result<()>;

    /// `None` when nothing was saved under `session_id`.
    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>>;

    fn exists(&self, session_id: &str) -> bool;

    fn delete(&self, session_id: &str) -> Result<()>;

    /// Saved session ids, sorted.
    fn list_sessions(&self) -> Result<Vec<String>>;
}

pub(crate) fn validate_session_id(session_id: &str) -> Result<()> {
    let valid = !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(super::RepositoryError::InvalidSessionId(
            session_id.to_string(),
        ))
    }
}
