//! Persisted session schema.
//!
//! A [`SessionSnapshot`] is the compatibility-relevant view of an encounter:
//! rosters, turn, phase and acted-set. Derived stats are never stored;
//! [`SessionSnapshot::restore`] rebuilds them from the unit catalog and the
//! persisted modifiers.

use crate::env::UnitCatalog;
use crate::error::{ErrorSeverity, GameError};
use crate::grid::Grid;
use crate::modifier::{ModifierKind, ModifierSet, TimedModifier};
use crate::state::{
    Allegiance, EncounterOutcome, EncounterState, Facing, Phase, Position, StateError, TurnIndex,
    TurnState, Unit, UnitId,
};
use crate::stats::recalculate_stats;

/// One unit as persisted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitRecord {
    pub id: u32,
    /// Unit template name.
    pub entity: String,
    pub allegiance: Allegiance,
    pub position: Position,
    pub hp: u32,
    pub mp: u32,
    pub moved: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub acted: bool,
    pub facing: Facing,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub buffs: Vec<TimedModifier>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub debuffs: Vec<TimedModifier>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub statuses: Vec<TimedModifier>,
}

impl UnitRecord {
    pub fn capture(unit: &Unit) -> Self {
        Self {
            id: unit.id.0,
            entity: unit.template.clone(),
            allegiance: unit.allegiance,
            position: unit.position,
            hp: unit.hp,
            mp: unit.mp,
            moved: unit.has_moved,
            acted: unit.has_acted,
            facing: unit.facing,
            buffs: records(unit, ModifierKind::Buff),
            debuffs: records(unit, ModifierKind::Debuff),
            statuses: records(unit, ModifierKind::Status),
        }
    }

    fn restore(&self, catalog: &dyn UnitCatalog) -> Result<Unit, RestoreError> {
        let id = UnitId(self.id);
        let template = catalog
            .template(&self.entity)
            .ok_or_else(|| RestoreError::UnknownEntity {
                unit: id,
                entity: self.entity.clone(),
            })?;

        let mut unit = Unit::from_template(id, template, self.allegiance, self.position);
        unit.facing = self.facing;
        unit.has_moved = self.moved;
        unit.has_acted = self.acted;
        unit.buffs = ModifierSet::from(self.buffs.clone());
        unit.debuffs = ModifierSet::from(self.debuffs.clone());
        unit.statuses = ModifierSet::from(self.statuses.clone());
        recalculate_stats(&mut unit, false);
        unit.hp = self.hp.min(unit.max_hp);
        unit.mp = self.mp.min(unit.max_mp);
        Ok(unit)
    }
}

fn records(unit: &Unit, kind: ModifierKind) -> Vec<TimedModifier> {
    unit.modifiers(kind).iter().cloned().collect()
}

/// Serializable encounter session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    pub player: Option<UnitRecord>,
    pub allies: Vec<UnitRecord>,
    pub enemies: Vec<UnitRecord>,
    pub turn: u32,
    pub phase: Phase,
    pub acted: Vec<u32>,
    pub seed: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nonce: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub outcome: Option<EncounterOutcome>,
}

impl SessionSnapshot {
    pub fn capture(state: &EncounterState) -> Self {
        let player = state.rosters.party.iter().find(|u| u.id.is_player());
        Self {
            player: player.map(UnitRecord::capture),
            allies: state
                .rosters
                .party
                .iter()
                .filter(|u| !u.id.is_player())
                .map(UnitRecord::capture)
                .collect(),
            enemies: state.rosters.enemies.iter().map(UnitRecord::capture).collect(),
            turn: state.turn.turn.0,
            phase: state.turn.phase,
            acted: state.turn.acted.iter().map(|id| id.0).collect(),
            seed: state.seed,
            nonce: state.nonce,
            outcome: state.outcome,
        }
    }

    /// Rebuilds the encounter on `grid`.
    ///
    /// Current HP and MP are restored as saved, clamped to the recomputed
    /// maximums. Records already at 0 HP are dropped.
    pub fn restore(
        &self,
        catalog: &dyn UnitCatalog,
        grid: &Grid,
    ) -> Result<EncounterState, RestoreError> {
        let mut state = EncounterState::new(grid.clone(), self.seed);
        state.nonce = self.nonce;
        state.outcome = self.outcome;
        state.turn = TurnState {
            turn: TurnIndex(self.turn),
            phase: self.phase,
            acted: self.acted.iter().map(|&id| UnitId(id)).collect(),
            free_control: false,
        };

        let records = self.player.iter().chain(&self.allies).chain(&self.enemies);
        for record in records.filter(|r| r.hp > 0) {
            let unit = record.restore(catalog)?;
            state
                .add_unit(unit)
                .map_err(|source| RestoreError::Placement {
                    unit: UnitId(record.id),
                    source,
                })?;
        }
        Ok(state)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    #[error("unit {unit} references unknown entity '{entity}'")]
    UnknownEntity { unit: UnitId, entity: String },

    #[error("unit {unit} cannot be placed: {source}")]
    Placement {
        unit: UnitId,
        #[source]
        source: StateError,
    },
}

impl GameError for RestoreError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity { .. } => "RESTORE_UNKNOWN_ENTITY",
            Self::Placement { .. } => "RESTORE_PLACEMENT",
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::modifier::{ModifierPayload, StatPayload};
    use crate::state::UnitTemplate;
    use crate::state::testing::template;

    struct Catalog(HashMap<String, UnitTemplate>);

    impl UnitCatalog for Catalog {
        fn template(&self, name: &str) -> Option<&UnitTemplate> {
            self.0.get(name)
        }
    }

    fn catalog() -> Catalog {
        Catalog(
            ["hero", "squire", "slime"]
                .into_iter()
                .map(|name| (name.to_string(), template(name)))
                .collect(),
        )
    }

    fn session() -> EncounterState {
        let mut state = EncounterState::new(Grid::open(6, 6), 99);
        state
            .spawn(&template("hero"), Allegiance::Player, Position::new(1, 1))
            .unwrap();
        state
            .spawn(&template("squire"), Allegiance::Ally, Position::new(2, 1))
            .unwrap();
        state
            .spawn(&template("slime"), Allegiance::Enemy, Position::new(5, 5))
            .unwrap();

        let squire = state.unit_mut(UnitId(1)).unwrap();
        squire.has_moved = true;
        squire.facing = Facing::Right;
        squire.buffs.upsert(TimedModifier {
            id: "guard".into(),
            duration: 2,
            applied_turn: TurnIndex(3),
            source: Some(UnitId::PLAYER),
            payload: ModifierPayload::Stats(StatPayload {
                attributes: crate::stats::Attributes::new(0, 0, 4, 0, 0, 0),
                ..StatPayload::default()
            }),
        });
        recalculate_stats(squire, false);
        squire.hp = 120;

        state.turn.turn = TurnIndex(3);
        state.turn.acted.insert(UnitId(1));
        state.nonce = 17;
        state
    }

    #[test]
    fn json_round_trip_reproduces_the_session() {
        let snapshot = SessionSnapshot::capture(&session());
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: SessionSnapshot = serde_json::from_str(&json).unwrap();
        let state = restored.restore(&catalog(), &Grid::open(6, 6)).unwrap();

        assert_eq!(SessionSnapshot::capture(&state), snapshot);
        assert_eq!(state.turn.phase, Phase::Player);
        assert!(state.turn.has_acted(UnitId(1)));

        let squire = state.unit(UnitId(1)).unwrap();
        assert_eq!(squire.hp, 120);
        assert_eq!(squire.attributes.vit, 14);
        state.check_invariants().unwrap();
    }

    #[test]
    fn phase_is_a_lowercase_string() {
        let mut state = session();
        state.turn.phase = Phase::FreeRoam;
        let value = serde_json::to_value(SessionSnapshot::capture(&state)).unwrap();
        assert_eq!(value["phase"], "free-roam");
        assert_eq!(value["acted"], serde_json::json!([1]));
    }

    #[test]
    fn unknown_entity_is_rejected() {
        let mut snapshot = SessionSnapshot::capture(&session());
        snapshot.enemies[0].entity = "dragon".into();
        assert_eq!(
            snapshot.restore(&catalog(), &Grid::open(6, 6)),
            Err(RestoreError::UnknownEntity {
                unit: UnitId(2),
                entity: "dragon".into(),
            })
        );
    }

    #[test]
    fn restored_summon_ids_do_not_collide() {
        let mut state = session();
        let summon = Unit::from_template(
            UnitId(9),
            &template("squire"),
            Allegiance::Summon,
            Position::new(3, 3),
        );
        state.add_unit(summon).unwrap();

        let restored = SessionSnapshot::capture(&state)
            .restore(&catalog(), &Grid::open(6, 6))
            .unwrap();
        assert_eq!(restored.peek_unit_id(), UnitId(10));
    }
}
