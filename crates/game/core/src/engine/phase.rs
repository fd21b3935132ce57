//! Phase transitions and the per-turn modifier pass.

use super::commit::settle;
use super::enemy::run_enemy_phase;
use crate::env::{GameEnv, SeedStream};
use crate::event::GameEvent;
use crate::modifier::{ModifierKind, process_buffs, process_status_effects};
use crate::state::{EncounterState, Phase, TurnIndex};
use crate::stats::recalculate_stats;

/// Seed context for the turn-start status pass.
const STATUS_CONTEXT: u32 = 0x5747;

/// Enters combat at turn one with every unit refreshed to full resources.
pub(crate) fn start_encounter(state: &mut EncounterState) -> Vec<GameEvent> {
    state.outcome = None;
    state.turn.turn = TurnIndex::FIRST;
    state.turn.acted.clear();
    for unit in state.rosters.party.iter_mut().chain(state.rosters.enemies.iter_mut()) {
        unit.ready();
        recalculate_stats(unit, true);
    }

    let phase = if state.rosters.living_enemies().next().is_some() {
        Phase::Player
    } else {
        Phase::FreeRoam
    };
    state.turn.phase = phase;

    vec![
        GameEvent::TurnChanged {
            turn: state.turn.turn,
        },
        GameEvent::PhaseChanged { phase },
    ]
}

/// Hands control to the enemy roster, then opens the next player phase.
pub(crate) fn end_player_phase(state: &mut EncounterState, env: &GameEnv<'_>) -> Vec<GameEvent> {
    state.turn.phase = Phase::Enemy;
    let mut events = vec![GameEvent::PhaseChanged { phase: Phase::Enemy }];

    events.extend(run_enemy_phase(state, env));
    if state.outcome.is_none() {
        events.extend(start_player_phase(state, env));
    }
    events
}

/// Closes the current turn and opens the next player phase.
///
/// Buffs and debuffs tick first, then statuses. A unit held by a skipping
/// status is marked as having acted and moved; party members also join the
/// acted-set so the phase can still end.
pub(crate) fn start_player_phase(state: &mut EncounterState, env: &GameEnv<'_>) -> Vec<GameEvent> {
    let closing = state.turn.turn;
    state.turn.turn = closing.next();
    state.turn.phase = Phase::Player;
    state.turn.acted.clear();

    let mut events = vec![
        GameEvent::TurnChanged {
            turn: state.turn.turn,
        },
        GameEvent::PhaseChanged {
            phase: Phase::Player,
        },
    ];

    let rng = env.rng();
    let (seed, nonce) = (state.seed, state.nonce);

    for id in state.rosters.ids() {
        let Some(unit) = state.unit_mut(id).filter(|u| u.is_alive()) else {
            continue;
        };
        unit.ready();

        let buffs = process_buffs(unit, closing);
        for (modifier, damage) in buffs.damage {
            events.push(GameEvent::StatusTicked {
                unit: id,
                id: modifier,
                damage,
                remaining_hp: unit.hp,
            });
        }
        for (kind, modifier) in buffs.expired {
            events.push(GameEvent::ModifierExpired {
                unit: id,
                id: modifier,
                kind,
            });
        }

        let mut seeds = SeedStream::with_context(seed, nonce, id, STATUS_CONTEXT);
        let statuses = process_status_effects(unit, closing, rng, seeds.next_seed());
        for (modifier, damage) in statuses.damage {
            events.push(GameEvent::StatusTicked {
                unit: id,
                id: modifier,
                damage,
                remaining_hp: unit.hp,
            });
        }
        for modifier in statuses.expired {
            events.push(GameEvent::ModifierExpired {
                unit: id,
                id: modifier,
                kind: ModifierKind::Status,
            });
        }

        recalculate_stats(unit, false);

        let Some(status) = statuses.skip.filter(|_| unit.is_alive()) else {
            continue;
        };
        unit.has_acted = true;
        unit.has_moved = true;
        if unit.is_party() {
            state.turn.acted.insert(id);
        }
        events.push(GameEvent::TurnSkipped { unit: id, status });
    }

    // Keeps paralysis rolls apart between consecutive turns.
    state.nonce += 1;
    settle(state, &mut events);
    events
}
