//! Rejected commands.
//!
//! Every variant is produced by the pure `compute` half of the pipeline, so a
//! rejection never leaves a partial mutation behind.

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::skill::SkillId;
use crate::state::{Phase, Position, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("target {0} not found")]
    TargetNotFound(UnitId),

    #[error("unit {unit} cannot act during the {phase} phase")]
    NotYourPhase { unit: UnitId, phase: Phase },

    #[error("no encounter in progress")]
    NotInCombat,

    #[error("the encounter is over")]
    EncounterOver,

    #[error("unit {0} has already acted this turn")]
    AlreadyActed(UnitId),

    #[error("unit {0} has already moved this turn")]
    AlreadyMoved(UnitId),

    #[error("unit {unit} cannot reach {to}")]
    Unreachable { unit: UnitId, to: Position },

    #[error("target is {distance} away, unit {unit} reaches {range}")]
    OutOfRange {
        unit: UnitId,
        distance: u32,
        range: u32,
    },

    #[error("unit {unit} cannot target {position} with {skill}")]
    InvalidTarget {
        unit: UnitId,
        skill: SkillId,
        position: Position,
    },

    #[error("unit {unit} cannot attack {target}: same side")]
    FriendlyTarget { unit: UnitId, target: UnitId },

    #[error("unit {unit} has no usable skill {skill}")]
    UnknownSkill { unit: UnitId, skill: SkillId },

    #[error("unit {unit} needs {cost} MP, has {available}")]
    InsufficientResource {
        unit: UnitId,
        cost: u32,
        available: u32,
    },
}

impl ActionError {
    /// Unit the rejected command was issued for, if any.
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Self::UnitNotFound(unit) | Self::AlreadyActed(unit) | Self::AlreadyMoved(unit) => {
                Some(*unit)
            }
            Self::NotYourPhase { unit, .. }
            | Self::Unreachable { unit, .. }
            | Self::OutOfRange { unit, .. }
            | Self::InvalidTarget { unit, .. }
            | Self::FriendlyTarget { unit, .. }
            | Self::UnknownSkill { unit, .. }
            | Self::InsufficientResource { unit, .. } => Some(*unit),
            Self::TargetNotFound(_) | Self::NotInCombat | Self::EncounterOver => None,
        }
    }

    /// Diagnostic context for the runtime's rejection notice.
    pub fn context_at(&self, nonce: u64) -> ErrorContext {
        let context = ErrorContext::new(nonce);
        let context = match self.unit() {
            Some(unit) => context.with_unit(unit),
            None => context,
        };
        match self {
            Self::Unreachable { to, .. } => context.with_position(*to),
            Self::InvalidTarget { position, .. } => context.with_position(*position),
            _ => context,
        }
    }
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnitNotFound(_)
            | Self::TargetNotFound(_)
            | Self::UnknownSkill { .. }
            | Self::NotInCombat
            | Self::EncounterOver => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "ACTION_UNIT_NOT_FOUND",
            Self::TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            Self::NotYourPhase { .. } => "ACTION_NOT_YOUR_PHASE",
            Self::NotInCombat => "ACTION_NOT_IN_COMBAT",
            Self::EncounterOver => "ACTION_ENCOUNTER_OVER",
            Self::AlreadyActed(_) => "ACTION_ALREADY_ACTED",
            Self::AlreadyMoved(_) => "ACTION_ALREADY_MOVED",
            Self::Unreachable { .. } => "ACTION_UNREACHABLE",
            Self::OutOfRange { .. } => "ACTION_OUT_OF_RANGE",
            Self::InvalidTarget { .. } => "ACTION_INVALID_TARGET",
            Self::FriendlyTarget { .. } => "ACTION_FRIENDLY_TARGET",
            Self::UnknownSkill { .. } => "ACTION_UNKNOWN_SKILL",
            Self::InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_errors_are_recoverable() {
        let err = ActionError::OutOfRange {
            unit: UnitId(1),
            distance: 4,
            range: 1,
        };
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "ACTION_OUT_OF_RANGE");
        assert_eq!(err.context_at(7).unit, Some(UnitId(1)));
    }

    #[test]
    fn missing_data_is_validation() {
        let err = ActionError::UnknownSkill {
            unit: UnitId(1),
            skill: SkillId::from("nope"),
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }
}
