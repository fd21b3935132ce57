//! Authoritative encounter state.
//!
//! [`EncounterState`] is an explicit value owned by the caller and passed to
//! every query and mutation; there is no ambient game state. Mutation goes
//! through [`crate::engine::TurnEngine`].
mod common;
mod error;
mod roster;
mod turn;
mod unit;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashSet;

use crate::config::GameConfig;
use crate::grid::Grid;

pub use common::{Allegiance, Facing, Position, TurnIndex, UnitId};
pub use error::{InvariantError, StateError};
pub use roster::Rosters;
pub use turn::{Phase, TurnState};
pub use unit::{Unit, UnitTemplate};

/// How an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum EncounterOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EncounterState {
    pub grid: Grid,
    pub rosters: Rosters,
    pub turn: TurnState,
    /// Base seed for every roll in this encounter.
    pub seed: u64,
    /// Committed action counter, mixed into every roll seed.
    pub nonce: u64,
    pub outcome: Option<EncounterOutcome>,
    /// Next id handed out by [`Self::spawn`]. `0` is reserved for the player.
    next_unit_id: u32,
}

impl EncounterState {
    pub fn new(grid: Grid, seed: u64) -> Self {
        Self {
            grid,
            rosters: Rosters::default(),
            turn: TurnState::new(),
            seed,
            nonce: 0,
            outcome: None,
            next_unit_id: 1,
        }
    }

    /// Id the next spawned non-player unit will receive.
    pub fn peek_unit_id(&self) -> UnitId {
        UnitId(self.next_unit_id)
    }

    /// Places a fresh unit built from `template`.
    ///
    /// The first player-allegiance unit receives [`UnitId::PLAYER`].
    pub fn spawn(
        &mut self,
        template: &UnitTemplate,
        allegiance: Allegiance,
        position: Position,
    ) -> Result<UnitId, StateError> {
        let id = if allegiance == Allegiance::Player && self.rosters.unit(UnitId::PLAYER).is_none()
        {
            UnitId::PLAYER
        } else {
            self.peek_unit_id()
        };
        self.add_unit(Unit::from_template(id, template, allegiance, position))?;
        Ok(id)
    }

    /// Inserts an already-built unit after checking its id, capacity and
    /// placement.
    pub fn add_unit(&mut self, unit: Unit) -> Result<(), StateError> {
        if self.rosters.unit(unit.id).is_some() {
            return Err(StateError::DuplicateId { unit: unit.id });
        }
        let (side, len, max) = if unit.is_party() {
            ("party", self.rosters.party.len(), GameConfig::MAX_PARTY)
        } else {
            ("enemy", self.rosters.enemies.len(), GameConfig::MAX_ENEMIES)
        };
        if len >= max {
            return Err(StateError::RosterFull { side, max });
        }
        if !self.grid.is_passable(unit.position) {
            return Err(StateError::Impassable {
                position: unit.position,
            });
        }
        if let Some(occupant) = self.rosters.at(unit.position) {
            return Err(StateError::PositionOccupied {
                position: unit.position,
                occupant: occupant.id,
            });
        }
        self.next_unit_id = self.next_unit_id.max(unit.id.0 + 1);
        self.rosters.insert(unit);
        Ok(())
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.rosters.unit(id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.rosters.unit_mut(id)
    }

    /// A living unit stands on `position`.
    pub fn is_occupied(&self, position: Position) -> bool {
        self.rosters.at(position).is_some()
    }

    /// Win/lose check. Free-roam is never an outcome.
    pub fn evaluate_outcome(&self) -> Option<EncounterOutcome> {
        if self.rosters.living_party().next().is_none() {
            Some(EncounterOutcome::Defeat)
        } else if self.turn.in_combat() && self.rosters.living_enemies().next().is_none() {
            Some(EncounterOutcome::Victory)
        } else {
            None
        }
    }

    /// Verifies the roster invariants that every committed action must keep.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut ids = HashSet::new();
        let mut cells = std::collections::HashMap::new();

        for (party, roster) in [(true, &self.rosters.party), (false, &self.rosters.enemies)] {
            for unit in roster {
                if !unit.is_alive() {
                    return Err(InvariantError::DeadUnitInRoster { unit: unit.id });
                }
                if unit.hp > unit.max_hp {
                    return Err(InvariantError::HpAboveMaximum {
                        unit: unit.id,
                        hp: unit.hp,
                        max_hp: unit.max_hp,
                    });
                }
                if unit.is_party() != party {
                    return Err(InvariantError::WrongRoster { unit: unit.id });
                }
                if !ids.insert(unit.id) {
                    return Err(InvariantError::DuplicateUnit { unit: unit.id });
                }
                if !self.grid.is_passable(unit.position) {
                    return Err(InvariantError::Impassable {
                        unit: unit.id,
                        position: unit.position,
                    });
                }
                if let Some(first) = cells.insert(unit.position, unit.id) {
                    return Err(InvariantError::SharedCell {
                        first,
                        second: unit.id,
                        position: unit.position,
                    });
                }
                for set in [&unit.buffs, &unit.debuffs, &unit.statuses] {
                    if let Some(id) = set.duplicate_id() {
                        return Err(InvariantError::DuplicateModifier {
                            unit: unit.id,
                            id: id.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
