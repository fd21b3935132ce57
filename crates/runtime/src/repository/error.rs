//! Session repository failures.

use thiserror::Error;

/// Why a session could not be read or written.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("session repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid session id '{0}'")]
    InvalidSessionId(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
