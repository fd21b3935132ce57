//! Application of planned actions to the encounter.

use std::collections::BTreeSet;

use super::action::{Effect, PlannedAction};
use crate::combat::HitResult;
use crate::event::GameEvent;
use crate::modifier::{ModifierUpsert, grant_modifier};
use crate::state::{EncounterOutcome, EncounterState, Facing, Phase, Position, UnitId};
use crate::stats::recalculate_stats;

/// Applies `action` and advances the nonce.
///
/// `EndPhase` is a no-op here; phase changes are driven by the engine.
pub(crate) fn apply(state: &mut EncounterState, action: PlannedAction) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match action {
        PlannedAction::Move { unit, from, path } => apply_move(state, unit, from, path, &mut events),
        PlannedAction::Attack { unit, target, hit } => {
            face(state, unit, position_of(state, target));
            apply_damage(state, Some(unit), target, hit, &mut events);
            mark_acted(state, unit);
        }
        PlannedAction::Skill {
            unit,
            cost,
            aim,
            effects,
            ..
        } => {
            face(state, unit, Some(aim));
            if let Some(caster) = state.unit_mut(unit) {
                caster.mp = caster.mp.saturating_sub(cost);
            }
            apply_effects(state, unit, effects, &mut events);
            mark_acted(state, unit);
        }
        PlannedAction::Wait { unit } => mark_acted(state, unit),
        PlannedAction::EndPhase => return events,
    }

    state.nonce += 1;
    settle(state, &mut events);
    events
}

fn position_of(state: &EncounterState, id: UnitId) -> Option<Position> {
    state.unit(id).map(|u| u.position)
}

fn face(state: &mut EncounterState, id: UnitId, toward: Option<Position>) {
    let Some(toward) = toward else { return };
    if let Some(unit) = state.unit_mut(id) {
        if let Some(facing) = Facing::toward(unit.position, toward) {
            unit.facing = facing;
        }
    }
}

fn apply_move(
    state: &mut EncounterState,
    id: UnitId,
    from: Position,
    path: Vec<Position>,
    events: &mut Vec<GameEvent>,
) {
    let in_combat = state.turn.in_combat();
    let Some(unit) = state.unit_mut(id) else { return };
    let Some(&to) = path.last() else { return };

    let before_last = path.iter().rev().nth(1).copied().unwrap_or(from);
    if let Some(facing) = Facing::toward(before_last, to) {
        unit.facing = facing;
    }
    unit.position = to;
    if in_combat {
        unit.has_moved = true;
    }
    events.push(GameEvent::UnitMoved {
        unit: id,
        from,
        to,
        path,
    });
}

fn mark_acted(state: &mut EncounterState, id: UnitId) {
    let Some(unit) = state.unit_mut(id) else { return };
    unit.has_acted = true;
    if unit.is_party() {
        state.turn.acted.insert(id);
    }
}

fn apply_damage(
    state: &mut EncounterState,
    source: Option<UnitId>,
    target: UnitId,
    hit: HitResult,
    events: &mut Vec<GameEvent>,
) {
    let Some(unit) = state.unit_mut(target).filter(|u| u.is_alive()) else {
        return;
    };
    let remaining_hp = unit.take_damage(hit.applied());
    events.push(GameEvent::DamageApplied {
        source,
        target,
        amount: hit.amount,
        critical: hit.critical,
        defended: hit.defended,
        remaining_hp,
    });
}

fn apply_effects(
    state: &mut EncounterState,
    caster: UnitId,
    effects: Vec<Effect>,
    events: &mut Vec<GameEvent>,
) {
    let mut touched = BTreeSet::new();

    for effect in effects {
        match effect {
            Effect::Damage { target, hit } => {
                apply_damage(state, Some(caster), target, hit, events);
            }
            Effect::Heal { target, amount } => {
                let Some(unit) = state.unit_mut(target).filter(|u| u.is_alive()) else {
                    continue;
                };
                let healed = unit.restore_hp(amount);
                events.push(GameEvent::Healed {
                    source: caster,
                    target,
                    amount: healed,
                });
            }
            Effect::Modifier {
                target,
                kind,
                modifier,
            } => {
                let Some(unit) = state.unit_mut(target) else { continue };
                let id = modifier.id.clone();
                let duration = modifier.duration;
                let Some(upsert) = grant_modifier(unit, kind, modifier) else {
                    continue;
                };
                if upsert == ModifierUpsert::Unchanged {
                    continue;
                }
                touched.insert(target);
                events.push(GameEvent::ModifierApplied {
                    unit: target,
                    id,
                    kind,
                    duration,
                    refreshed: upsert == ModifierUpsert::Refreshed,
                });
            }
            Effect::Summon { unit } => {
                let (id, template, position) = (unit.id, unit.template.clone(), unit.position);
                if state.add_unit(*unit).is_ok() {
                    events.push(GameEvent::UnitSummoned {
                        unit: id,
                        summoner: caster,
                        template,
                        position,
                    });
                }
            }
        }
    }

    for id in touched {
        if let Some(unit) = state.unit_mut(id) {
            recalculate_stats(unit, false);
        }
    }
}

/// Removes the fallen and resolves the encounter outcome.
pub(crate) fn settle(state: &mut EncounterState, events: &mut Vec<GameEvent>) {
    for fallen in state.rosters.remove_dead() {
        state.turn.acted.remove(&fallen.id);
        events.push(GameEvent::UnitDied { unit: fallen.id });
    }

    if state.outcome.is_some() {
        return;
    }
    let Some(outcome) = state.evaluate_outcome() else {
        return;
    };
    state.outcome = Some(outcome);
    events.push(GameEvent::EncounterEnded { outcome });
    if outcome == EncounterOutcome::Victory {
        state.turn.phase = Phase::FreeRoam;
        events.push(GameEvent::PhaseChanged {
            phase: Phase::FreeRoam,
        });
    }
}
