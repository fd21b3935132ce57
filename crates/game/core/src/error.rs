//! Shared error classification for tactics-core.
//!
//! Each failing operation owns its error enum (`ActionError`,
//! `InvariantError`, `RestoreError`, `StateError`). They all implement
//! [`GameError`] so the runtime can decide how loudly to surface a failure
//! without matching on every variant.
//!
//! - A rejected command is `Recoverable`: nothing changed, pick another one.
//! - A reference to something that does not exist is `Validation`.
//! - A broken invariant is `Internal` and means a rules bug.
//! - Missing catalog data is not an error at all; lookups return `Option`.

use crate::state::{Position, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum ErrorSeverity {
    /// Out of range, unreachable, wrong phase.
    Recoverable,
    /// Unknown unit, unknown skill, unknown template.
    Validation,
    /// Dead unit left in a roster, duplicate modifier id.
    Internal,
    /// The encounter cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Where and when a failure happened, for rejection notices and logs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    pub unit: Option<UnitId>,
    pub position: Option<Position>,
    /// Encounter nonce when the failure was observed.
    pub nonce: u64,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(nonce: u64) -> Self {
        Self {
            unit: None,
            position: None,
            nonce,
        }
    }

    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Implemented by every tactics-core error enum.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier, e.g. `ACTION_OUT_OF_RANGE`.
    fn error_code(&self) -> &'static str;
}
