use std::collections::BTreeSet;

use super::{TurnIndex, UnitId};

/// Which roster may act.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    #[default]
    Player,
    Enemy,
    /// No enemies left; only movement is allowed until a new encounter.
    FreeRoam,
}

/// Turn counter, phase and the player-phase acted-set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub turn: TurnIndex,
    pub phase: Phase,
    /// Party units that have completed their action this player phase.
    /// Cleared only when a player phase starts.
    pub acted: BTreeSet<UnitId>,
    /// Debug override: ignore acted/moved flags when validating commands.
    pub free_control: bool,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_combat(&self) -> bool {
        self.phase != Phase::FreeRoam
    }

    pub fn has_acted(&self, unit: UnitId) -> bool {
        self.acted.contains(&unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_strings() {
        assert_eq!(Phase::FreeRoam.to_string(), "free-roam");
        assert_eq!("enemy".parse::<Phase>().unwrap(), Phase::Enemy);
        assert!(!TurnState {
            phase: Phase::FreeRoam,
            ..TurnState::new()
        }
        .in_combat());
    }
}
