//! Presentation hooks emitted by committed actions and phase changes.
//!
//! Events are fire-and-forget: the engine never branches on what a consumer
//! does with them.

use crate::modifier::{ModifierId, ModifierKind, StatusKind};
use crate::state::{EncounterOutcome, Phase, Position, TurnIndex, UnitId};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum GameEvent {
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
        path: Vec<Position>,
    },
    DamageApplied {
        source: Option<UnitId>,
        target: UnitId,
        /// Would-be damage; not applied when `defended`.
        amount: u32,
        critical: bool,
        defended: bool,
        remaining_hp: u32,
    },
    Healed {
        source: UnitId,
        target: UnitId,
        amount: u32,
    },
    UnitDied {
        unit: UnitId,
    },
    ModifierApplied {
        unit: UnitId,
        id: ModifierId,
        kind: ModifierKind,
        duration: u32,
        refreshed: bool,
    },
    ModifierExpired {
        unit: UnitId,
        id: ModifierId,
        kind: ModifierKind,
    },
    /// Damage-over-time from a debuff or a ticking status.
    StatusTicked {
        unit: UnitId,
        id: ModifierId,
        damage: u32,
        remaining_hp: u32,
    },
    TurnSkipped {
        unit: UnitId,
        status: StatusKind,
    },
    UnitSummoned {
        unit: UnitId,
        summoner: UnitId,
        template: String,
        position: Position,
    },
    PhaseChanged {
        phase: Phase,
    },
    TurnChanged {
        turn: TurnIndex,
    },
    EncounterEnded {
        outcome: EncounterOutcome,
    },
}

impl GameEvent {
    /// Phase, turn and encounter lifecycle events.
    pub fn is_turn_event(&self) -> bool {
        matches!(
            self,
            Self::PhaseChanged { .. } | Self::TurnChanged { .. } | Self::EncounterEnded { .. }
        )
    }
}
