//! Timed modifiers: buffs, debuffs and status effects.
//!
//! Every modifier carries a stable id derived from its payload or source
//! skill. A unit holds at most one modifier per id in each of its three
//! lists; re-application refreshes the duration instead of stacking.
mod apply;
mod tick;

use std::fmt;

use crate::config::GameConfig;
use crate::state::{TurnIndex, UnitId};
use crate::stats::{Attributes, StatDeltas};

pub use apply::{
    ModifierUpsert, apply_buff, apply_debuff, apply_status, build_modifier, build_status,
    grant_modifier, stable_id, status_lands,
};
pub use tick::{BuffTick, StatusTick, process_buffs, process_status_effects};

/// Deterministic key used to refresh instead of stack.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModifierId(pub String);

impl ModifierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModifierId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Which of the three per-unit lists a modifier lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum ModifierKind {
    Buff,
    Debuff,
    Status,
}

/// Status tags. Ticking kinds deal a share of max HP at turn start; the
/// others decide whether the unit loses its turn.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    Stun,
    Poison,
    Burn,
    Bleed,
    Paralyze,
    Freeze,
}

impl StatusKind {
    /// Default share of max HP lost per tick, if this status ticks at all.
    pub const fn default_tick(self) -> Option<f64> {
        match self {
            Self::Poison => Some(GameConfig::POISON_TICK),
            Self::Burn => Some(GameConfig::BURN_TICK),
            Self::Bleed => Some(GameConfig::BLEED_TICK),
            Self::Stun | Self::Paralyze | Self::Freeze => None,
        }
    }

    /// Stun and freeze always cost the turn.
    pub const fn always_skips(self) -> bool {
        matches!(self, Self::Stun | Self::Freeze)
    }
}

/// Stat deltas and multipliers carried by a buff or debuff.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatPayload {
    pub attributes: Attributes,
    pub stats: StatDeltas,
    pub attack_percent: i32,
    pub magic_attack_percent: i32,
    pub defense_percent: i32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub crit_bonus: i32,
    pub parry_chance: f64,
    pub taunt_chance: f64,
    pub move_bonus: i32,
    /// Share of max HP lost at each end-of-turn tick (debuffs only).
    pub dot_percent: f64,
}

impl Default for StatPayload {
    fn default() -> Self {
        Self {
            attributes: Attributes::ZERO,
            stats: StatDeltas::default(),
            attack_percent: 0,
            magic_attack_percent: 0,
            defense_percent: 0,
            damage_dealt: 1.0,
            damage_taken: 1.0,
            crit_bonus: 0,
            parry_chance: 0.0,
            taunt_chance: 0.0,
            move_bonus: 0,
            dot_percent: 0.0,
        }
    }
}

/// What a timed modifier does while it is active.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ModifierPayload {
    Stats(StatPayload),
    Status {
        kind: StatusKind,
        /// Overrides the default tick share for ticking kinds.
        potency: Option<f64>,
    },
}

impl ModifierPayload {
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self {
            Self::Status { kind, .. } => Some(*kind),
            Self::Stats(_) => None,
        }
    }
}

/// A modifier attached to a unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedModifier {
    pub id: ModifierId,
    /// Remaining whole turns.
    pub duration: u32,
    /// Turn the modifier was granted (or last refreshed); exempt from
    /// decrement on that turn.
    pub applied_turn: TurnIndex,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: Option<UnitId>,
    pub payload: ModifierPayload,
}

/// Buff or debuff as authored on a skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<ModifierId>,
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub payload: StatPayload,
}

/// Status effect as authored on a skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<ModifierId>,
    pub kind: StatusKind,
    pub duration: u32,
    /// Application probability in [0, 1].
    #[cfg_attr(feature = "serde", serde(default = "full_chance"))]
    pub chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub potency: Option<f64>,
}

#[cfg(feature = "serde")]
fn full_chance() -> f64 {
    1.0
}

/// Ordered modifier list holding at most one entry per id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModifierSet(Vec<TimedModifier>);

impl ModifierSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts a new modifier or refreshes the one with the same id.
    ///
    /// A refresh keeps the existing payload. When the incoming duration is
    /// longer it replaces the remaining duration and restarts the grant turn.
    pub fn upsert(&mut self, incoming: TimedModifier) -> ModifierUpsert {
        match self.0.iter_mut().find(|m| m.id == incoming.id) {
            Some(existing) if incoming.duration > existing.duration => {
                existing.duration = incoming.duration;
                existing.applied_turn = incoming.applied_turn;
                ModifierUpsert::Refreshed
            }
            Some(_) => ModifierUpsert::Unchanged,
            None => {
                self.0.push(incoming);
                ModifierUpsert::Added
            }
        }
    }

    pub fn get(&self, id: &ModifierId) -> Option<&TimedModifier> {
        self.0.iter().find(|m| &m.id == id)
    }

    pub fn contains(&self, id: &ModifierId) -> bool {
        self.get(id).is_some()
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.0
            .iter()
            .any(|m| m.payload.status_kind() == Some(kind))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedModifier> {
        self.0.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, TimedModifier> {
        self.0.iter_mut()
    }

    /// Drops every modifier with no remaining duration, returning their ids.
    pub(crate) fn drain_expired(&mut self) -> Vec<ModifierId> {
        let mut expired = Vec::new();
        self.0.retain(|m| {
            if m.duration == 0 {
                expired.push(m.id.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First id that appears more than once, if any.
    pub fn duplicate_id(&self) -> Option<&ModifierId> {
        self.0
            .iter()
            .enumerate()
            .find(|(i, m)| self.0[..*i].iter().any(|other| other.id == m.id))
            .map(|(_, m)| &m.id)
    }
}

impl From<Vec<TimedModifier>> for ModifierSet {
    /// Later duplicates refresh earlier entries.
    fn from(modifiers: Vec<TimedModifier>) -> Self {
        let mut set = Self::new();
        for modifier in modifiers {
            set.upsert(modifier);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ModifierSet {
    type Item = &'a TimedModifier;
    type IntoIter = std::slice::Iter<'a, TimedModifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
