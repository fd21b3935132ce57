//! Granting buffs, debuffs and statuses.
//!
//! A modifier's id is stable per skill and kind, so recasting refreshes the
//! existing entry instead of stacking a second one.

use super::{
    ModifierId, ModifierKind, ModifierPayload, ModifierSpec, StatusSpec, TimedModifier,
};
use crate::env::RngOracle;
use crate::skill::SkillId;
use crate::state::{TurnIndex, Unit, UnitId};

/// Result of inserting a modifier into a unit's list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierUpsert {
    Added,
    /// Same id already active; duration extended.
    Refreshed,
    /// Same id already active with an equal or longer duration.
    Unchanged,
}

/// Stable id: the payload's own id, else `{skill}:{suffix}`.
pub fn stable_id(explicit: Option<&ModifierId>, skill: &SkillId, suffix: &str) -> ModifierId {
    match explicit {
        Some(id) => id.clone(),
        None => ModifierId(format!("{}:{}", skill.as_str(), suffix)),
    }
}

/// Builds the modifier a buff or debuff spec grants on `turn`.
pub fn build_modifier(
    spec: &ModifierSpec,
    kind: ModifierKind,
    skill: &SkillId,
    source: Option<UnitId>,
    turn: TurnIndex,
) -> TimedModifier {
    TimedModifier {
        id: stable_id(spec.id.as_ref(), skill, &kind.to_string()),
        duration: spec.duration,
        applied_turn: turn,
        source,
        payload: ModifierPayload::Stats(spec.payload.clone()),
    }
}

/// Builds the modifier a status spec grants on `turn`.
pub fn build_status(
    spec: &StatusSpec,
    skill: &SkillId,
    source: Option<UnitId>,
    turn: TurnIndex,
) -> TimedModifier {
    TimedModifier {
        id: stable_id(spec.id.as_ref(), skill, &spec.kind.to_string()),
        duration: spec.duration,
        applied_turn: turn,
        source,
        payload: ModifierPayload::Status {
            kind: spec.kind,
            potency: spec.potency,
        },
    }
}

/// Independent application roll for a status effect.
pub fn status_lands(spec: &StatusSpec, rng: &dyn RngOracle, seed: u64) -> bool {
    rng.chance(seed, spec.chance)
}

/// Inserts a prepared modifier into the matching list.
///
/// Returns `None` for dead units and zero-duration modifiers.
pub fn grant_modifier(
    unit: &mut Unit,
    kind: ModifierKind,
    modifier: TimedModifier,
) -> Option<ModifierUpsert> {
    if !unit.is_alive() || modifier.duration == 0 {
        return None;
    }
    Some(unit.modifiers_mut(kind).upsert(modifier))
}

pub fn apply_buff(
    unit: &mut Unit,
    spec: &ModifierSpec,
    skill: &SkillId,
    source: Option<UnitId>,
    turn: TurnIndex,
) -> Option<ModifierUpsert> {
    let modifier = build_modifier(spec, ModifierKind::Buff, skill, source, turn);
    grant_modifier(unit, ModifierKind::Buff, modifier)
}

pub fn apply_debuff(
    unit: &mut Unit,
    spec: &ModifierSpec,
    skill: &SkillId,
    source: Option<UnitId>,
    turn: TurnIndex,
) -> Option<ModifierUpsert> {
    let modifier = build_modifier(spec, ModifierKind::Debuff, skill, source, turn);
    grant_modifier(unit, ModifierKind::Debuff, modifier)
}

/// Rolls the application chance, then refreshes or appends.
pub fn apply_status(
    unit: &mut Unit,
    spec: &StatusSpec,
    skill: &SkillId,
    source: Option<UnitId>,
    turn: TurnIndex,
    rng: &dyn RngOracle,
    seed: u64,
) -> Option<ModifierUpsert> {
    if !unit.is_alive() || !status_lands(spec, rng, seed) {
        return None;
    }
    let modifier = build_status(spec, skill, source, turn);
    grant_modifier(unit, ModifierKind::Status, modifier)
}
