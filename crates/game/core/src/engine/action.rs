//! Commands and the planned actions computed from them.

use crate::combat::HitResult;
use crate::modifier::{ModifierKind, TimedModifier};
use crate::skill::SkillId;
use crate::state::{Position, Unit, UnitId};

/// A request to act, from the player or the enemy chooser.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum PlayerCommand {
    Move {
        unit: UnitId,
        to: Position,
    },
    Attack {
        unit: UnitId,
        target: UnitId,
    },
    UseSkill {
        unit: UnitId,
        skill: SkillId,
        target: Position,
    },
    Wait {
        unit: UnitId,
    },
    EndPhase,
}

impl PlayerCommand {
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Self::Move { unit, .. }
            | Self::Attack { unit, .. }
            | Self::UseSkill { unit, .. }
            | Self::Wait { unit } => Some(*unit),
            Self::EndPhase => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Attack { .. } => "attack",
            Self::UseSkill { .. } => "use_skill",
            Self::Wait { .. } => "wait",
            Self::EndPhase => "end_phase",
        }
    }
}

/// One resolved consequence of a skill.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Damage {
        target: UnitId,
        hit: HitResult,
    },
    Heal {
        target: UnitId,
        amount: u32,
    },
    Modifier {
        target: UnitId,
        kind: ModifierKind,
        modifier: TimedModifier,
    },
    Summon {
        unit: Box<Unit>,
    },
}

/// Fully resolved action, ready to commit.
///
/// Every roll has already been made; committing only applies the values.
#[derive(Clone, Debug, PartialEq)]
pub enum PlannedAction {
    Move {
        unit: UnitId,
        from: Position,
        path: Vec<Position>,
    },
    Attack {
        unit: UnitId,
        target: UnitId,
        hit: HitResult,
    },
    Skill {
        unit: UnitId,
        skill: SkillId,
        cost: u32,
        /// Cell the caster turns to face.
        aim: Position,
        effects: Vec<Effect>,
    },
    Wait {
        unit: UnitId,
    },
    EndPhase,
}

impl PlannedAction {
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Self::Move { unit, .. }
            | Self::Attack { unit, .. }
            | Self::Skill { unit, .. }
            | Self::Wait { unit } => Some(*unit),
            Self::EndPhase => None,
        }
    }
}
