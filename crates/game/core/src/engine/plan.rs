//! Pure validation and resolution of commands.
//!
//! Nothing here mutates the encounter. Every roll is made against a
//! [`SeedStream`] derived from the current nonce, so computing the same
//! command twice on the same state yields the same plan.

use super::action::{Effect, PlannedAction, PlayerCommand};
use super::errors::ActionError;
use crate::combat::{calculate_heal, resolve_attack, resolve_skill_hits};
use crate::config::GameConfig;
use crate::env::{GameEnv, SeedStream};
use crate::grid::{find_path, reachable_cells};
use crate::modifier::{ModifierKind, build_modifier, build_status, status_lands};
use crate::skill::{SkillDescriptor, SkillId, SkillKind, reachable_skill_cells, skill_targets};
use crate::state::{Allegiance, EncounterState, Phase, Position, Unit, UnitId};

pub(crate) fn compute(
    state: &EncounterState,
    env: &GameEnv<'_>,
    command: &PlayerCommand,
) -> Result<PlannedAction, ActionError> {
    match command {
        PlayerCommand::Move { unit, to } => plan_move(state, *unit, *to),
        PlayerCommand::Attack { unit, target } => plan_attack(state, env, *unit, *target),
        PlayerCommand::UseSkill {
            unit,
            skill,
            target,
        } => plan_skill(state, env, *unit, skill, *target),
        PlayerCommand::Wait { unit } => {
            ready_to_act(state, *unit)?;
            Ok(PlannedAction::Wait { unit: *unit })
        }
        PlayerCommand::EndPhase => {
            combat_open(state)?;
            if state.turn.phase != Phase::Player {
                return Err(ActionError::NotYourPhase {
                    unit: UnitId::PLAYER,
                    phase: state.turn.phase,
                });
            }
            Ok(PlannedAction::EndPhase)
        }
    }
}

fn combat_open(state: &EncounterState) -> Result<(), ActionError> {
    if !state.turn.in_combat() {
        return Err(ActionError::NotInCombat);
    }
    if state.outcome.is_some() {
        return Err(ActionError::EncounterOver);
    }
    Ok(())
}

/// Living unit whose side owns the current phase.
fn acting_unit(state: &EncounterState, id: UnitId) -> Result<&Unit, ActionError> {
    let unit = state
        .unit(id)
        .filter(|u| u.is_alive())
        .ok_or(ActionError::UnitNotFound(id))?;

    let phase = state.turn.phase;
    let owns_phase = match phase {
        Phase::Player => unit.is_party(),
        Phase::Enemy => !unit.is_party(),
        Phase::FreeRoam => unit.is_party(),
    };
    if !owns_phase {
        return Err(ActionError::NotYourPhase { unit: id, phase });
    }
    Ok(unit)
}

/// Combat actor that has not yet spent its action this phase.
fn ready_to_act(state: &EncounterState, id: UnitId) -> Result<&Unit, ActionError> {
    combat_open(state)?;
    let unit = acting_unit(state, id)?;
    if !state.turn.free_control && (unit.has_acted || state.turn.has_acted(id)) {
        return Err(ActionError::AlreadyActed(id));
    }
    Ok(unit)
}

fn plan_move(state: &EncounterState, id: UnitId, to: Position) -> Result<PlannedAction, ActionError> {
    if state.turn.in_combat() && state.outcome.is_some() {
        return Err(ActionError::EncounterOver);
    }
    let unit = acting_unit(state, id)?;
    if state.turn.in_combat() && !state.turn.free_control {
        if unit.has_acted || state.turn.has_acted(id) {
            return Err(ActionError::AlreadyActed(id));
        }
        if unit.has_moved {
            return Err(ActionError::AlreadyMoved(id));
        }
    }

    let range = unit.effective_move_range();
    let reachable = reachable_cells(&state.grid, &state.rosters, unit.position, range);
    if !reachable.contains_key(&to) {
        return Err(ActionError::Unreachable { unit: id, to });
    }
    let path = find_path(&state.grid, &state.rosters, unit.position, to, range);
    if path.is_empty() {
        return Err(ActionError::Unreachable { unit: id, to });
    }

    Ok(PlannedAction::Move {
        unit: id,
        from: unit.position,
        path,
    })
}

fn plan_attack(
    state: &EncounterState,
    env: &GameEnv<'_>,
    id: UnitId,
    target_id: UnitId,
) -> Result<PlannedAction, ActionError> {
    let actor = ready_to_act(state, id)?;
    let target = state
        .unit(target_id)
        .filter(|u| u.is_alive())
        .ok_or(ActionError::TargetNotFound(target_id))?;
    if !actor.allegiance.is_hostile_to(target.allegiance) {
        return Err(ActionError::FriendlyTarget {
            unit: id,
            target: target_id,
        });
    }
    let distance = actor.position.chebyshev(target.position);
    if distance > actor.attack_range {
        return Err(ActionError::OutOfRange {
            unit: id,
            distance,
            range: actor.attack_range,
        });
    }

    let mut seeds = SeedStream::new(state.seed, state.nonce, id);
    let hit = resolve_attack(actor, target, env, &mut seeds);
    Ok(PlannedAction::Attack {
        unit: id,
        target: target_id,
        hit,
    })
}

fn plan_skill(
    state: &EncounterState,
    env: &GameEnv<'_>,
    id: UnitId,
    skill_id: &SkillId,
    aim: Position,
) -> Result<PlannedAction, ActionError> {
    let actor = ready_to_act(state, id)?;
    let unknown = || ActionError::UnknownSkill {
        unit: id,
        skill: skill_id.clone(),
    };
    let skill = env
        .skill(skill_id)
        .filter(|_| actor.knows(skill_id))
        .ok_or_else(unknown)?;
    if skill.cost > actor.mp {
        return Err(ActionError::InsufficientResource {
            unit: id,
            cost: skill.cost,
            available: actor.mp,
        });
    }

    let effects = if skill.kind == SkillKind::Summon {
        vec![plan_summon(state, env, actor, skill, aim)?]
    } else {
        plan_effects(state, env, actor, skill, aim)?
    };

    Ok(PlannedAction::Skill {
        unit: id,
        skill: skill.id.clone(),
        cost: skill.cost,
        aim,
        effects,
    })
}

fn invalid_target(actor: &Unit, skill: &SkillDescriptor, position: Position) -> ActionError {
    ActionError::InvalidTarget {
        unit: actor.id,
        skill: skill.id.clone(),
        position,
    }
}

fn plan_summon(
    state: &EncounterState,
    env: &GameEnv<'_>,
    actor: &Unit,
    skill: &SkillDescriptor,
    aim: Position,
) -> Result<Effect, ActionError> {
    if !actor.is_party() || state.rosters.party.len() >= GameConfig::MAX_PARTY {
        return Err(invalid_target(actor, skill, aim));
    }
    let template = skill
        .summon
        .as_deref()
        .and_then(|name| env.template(name))
        .ok_or_else(|| ActionError::UnknownSkill {
            unit: actor.id,
            skill: skill.id.clone(),
        })?;

    let cells = reachable_skill_cells(&state.grid, &state.rosters, actor, skill);
    if !cells.contains_key(&aim) || !state.grid.is_passable(aim) || state.is_occupied(aim) {
        return Err(invalid_target(actor, skill, aim));
    }

    let mut summoned = Unit::from_template(state.peek_unit_id(), template, Allegiance::Summon, aim);
    // Joins the acting order from the next player phase.
    summoned.has_acted = true;
    Ok(Effect::Summon {
        unit: Box::new(summoned),
    })
}

/// Per-target effects of a damage, heal or modifier skill.
///
/// Ally-aimed skills only heal and buff; their debuffs and statuses are
/// ignored. Debuffs and statuses land on opposing targets only.
fn plan_effects(
    state: &EncounterState,
    env: &GameEnv<'_>,
    actor: &Unit,
    skill: &SkillDescriptor,
    aim: Position,
) -> Result<Vec<Effect>, ActionError> {
    let Some(targets) = skill_targets(&state.grid, &state.rosters, actor, skill, aim) else {
        let distance = actor.position.manhattan(aim);
        return Err(if distance > skill.range {
            ActionError::OutOfRange {
                unit: actor.id,
                distance,
                range: skill.range,
            }
        } else {
            invalid_target(actor, skill, aim)
        });
    };

    let rng = env.rng();
    let turn = state.turn.turn;
    let source = Some(actor.id);
    let mut seeds = SeedStream::new(state.seed, state.nonce, actor.id);
    let mut effects = Vec::new();

    for target in targets.units.iter().filter_map(|id| state.unit(*id)) {
        if skill.kind.deals_damage() {
            effects.extend(
                resolve_skill_hits(actor, target, skill, env, &mut seeds)
                    .into_iter()
                    .map(|hit| Effect::Damage {
                        target: target.id,
                        hit,
                    }),
            );
        }
        if let Some(heal) = skill.heal.as_ref().filter(|_| skill.kind.heals()) {
            effects.push(Effect::Heal {
                target: target.id,
                amount: calculate_heal(heal, target.max_hp, actor.stats.magic_attack),
            });
        }

        if skill.targets_allies() {
            if let Some(buff) = &skill.buff {
                effects.push(Effect::Modifier {
                    target: target.id,
                    kind: ModifierKind::Buff,
                    modifier: build_modifier(buff, ModifierKind::Buff, &skill.id, source, turn),
                });
            }
            continue;
        }

        if let Some(debuff) = &skill.debuff {
            effects.push(Effect::Modifier {
                target: target.id,
                kind: ModifierKind::Debuff,
                modifier: build_modifier(debuff, ModifierKind::Debuff, &skill.id, source, turn),
            });
        }
        for status in &skill.statuses {
            if status_lands(status, rng, seeds.next_seed()) {
                effects.push(Effect::Modifier {
                    target: target.id,
                    kind: ModifierKind::Status,
                    modifier: build_status(status, &skill.id, source, turn),
                });
            }
        }
    }

    // Offensive skills carrying a buff empower the caster.
    if let Some(buff) = skill.buff.as_ref().filter(|_| !skill.targets_allies()) {
        effects.push(Effect::Modifier {
            target: actor.id,
            kind: ModifierKind::Buff,
            modifier: build_modifier(buff, ModifierKind::Buff, &skill.id, source, turn),
        });
    }

    Ok(effects)
}
