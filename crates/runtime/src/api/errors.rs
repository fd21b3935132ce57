//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule rejections, restore failures, repository failures and worker
//! coordination failures so clients can bubble them up with one type.
use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{ActionError, ErrorSeverity, GameError, RestoreError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("failed to restore session")]
    Restore(#[from] RestoreError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("no session saved under '{0}'")]
    SessionNotFound(String),

    #[error("runtime has no session repository")]
    RepositoryNotSet,

    #[error("command provider not set")]
    ProviderNotSet,

    #[error("command provider lock poisoned")]
    ProviderPoisoned,

    #[error("plan was computed at nonce {planned_at}, state is now at {current}")]
    StalePlan { planned_at: u64, current: u64 },

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("runtime requires an initial encounter state")]
    MissingState,
}

impl RuntimeError {
    /// Stable code for rule-level failures, `None` for infrastructure ones.
    pub fn rule_code(&self) -> Option<&'static str> {
        match self {
            Self::Action(err) => Some(err.error_code()),
            Self::Restore(err) => Some(err.error_code()),
            _ => None,
        }
    }

    /// Fatal when the worker is gone and the handle is unusable.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Action(err) => err.severity(),
            Self::Restore(err) => err.severity(),
            Self::StalePlan { .. } => ErrorSeverity::Recoverable,
            Self::SessionNotFound(_)
            | Self::RepositoryNotSet
            | Self::ProviderNotSet
            | Self::MissingOracles
            | Self::MissingState => ErrorSeverity::Validation,
            Self::Repository(_) | Self::ProviderPoisoned => ErrorSeverity::Internal,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Fatal
            }
        }
    }
}
