//! Encounter state errors.
//!
//! [`StateError`] covers rejected roster edits. [`InvariantError`] reports a
//! broken encounter invariant; it indicates a defect and is asserted on in
//! tests rather than handled at runtime.

use crate::error::{ErrorSeverity, GameError};
use crate::modifier::ModifierId;
use crate::state::{Position, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("{side} roster is full (max: {max})")]
    RosterFull { side: &'static str, max: usize },

    #[error("position {position} is occupied by unit {occupant}")]
    PositionOccupied {
        position: Position,
        occupant: UnitId,
    },

    #[error("position {position} is not a passable cell")]
    Impassable { position: Position },

    #[error("unit id {unit} is already in use")]
    DuplicateId { unit: UnitId },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RosterFull { .. } => "STATE_ROSTER_FULL",
            Self::PositionOccupied { .. } => "STATE_POSITION_OCCUPIED",
            Self::Impassable { .. } => "STATE_IMPASSABLE",
            Self::DuplicateId { .. } => "STATE_DUPLICATE_ID",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("unit {unit} has 0 HP but is still in a roster")]
    DeadUnitInRoster { unit: UnitId },

    #[error("unit {unit} has {hp} HP, above its maximum {max_hp}")]
    HpAboveMaximum { unit: UnitId, hp: u32, max_hp: u32 },

    #[error("unit {unit} carries modifier {id} more than once")]
    DuplicateModifier { unit: UnitId, id: ModifierId },

    #[error("unit id {unit} appears more than once")]
    DuplicateUnit { unit: UnitId },

    #[error("units {first} and {second} share {position}")]
    SharedCell {
        first: UnitId,
        second: UnitId,
        position: Position,
    },

    #[error("unit {unit} stands on impassable cell {position}")]
    Impassable { unit: UnitId, position: Position },

    #[error("unit {unit} is in the wrong roster")]
    WrongRoster { unit: UnitId },
}

impl GameError for InvariantError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DeadUnitInRoster { .. } => "INVARIANT_DEAD_UNIT",
            Self::HpAboveMaximum { .. } => "INVARIANT_HP_ABOVE_MAX",
            Self::DuplicateModifier { .. } => "INVARIANT_DUPLICATE_MODIFIER",
            Self::DuplicateUnit { .. } => "INVARIANT_DUPLICATE_UNIT",
            Self::SharedCell { .. } => "INVARIANT_SHARED_CELL",
            Self::Impassable { .. } => "INVARIANT_IMPASSABLE",
            Self::WrongRoster { .. } => "INVARIANT_WRONG_ROSTER",
        }
    }
}
