//! Enemy phase auto-play.

use super::action::PlayerCommand;
use super::ai::{choose_action, choose_approach};
use super::{commit, plan};
use crate::env::GameEnv;
use crate::event::GameEvent;
use crate::state::{EncounterState, UnitId};

/// Plays every living enemy once, in roster order.
///
/// An enemy that cannot reach or hit anyone passes, so the loop always
/// terminates. Stops early once the encounter is decided.
pub(crate) fn run_enemy_phase(state: &mut EncounterState, env: &GameEnv<'_>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let order: Vec<UnitId> = state.rosters.living_enemies().map(|u| u.id).collect();

    for id in order {
        if state.outcome.is_some() {
            break;
        }
        let Some(enemy) = state.unit(id).filter(|u| u.is_alive()) else {
            continue;
        };
        if enemy.has_acted {
            continue;
        }
        events.extend(take_turn(state, env, id));
    }
    events
}

fn take_turn(state: &mut EncounterState, env: &GameEnv<'_>, id: UnitId) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if let Some(command) = choose_action(state, env, id) {
        events.extend(try_execute(state, env, &command));
    } else if let Some(to) = choose_approach(state, env, id) {
        events.extend(try_execute(state, env, &PlayerCommand::Move { unit: id, to }));
        if let Some(command) = choose_action(state, env, id) {
            events.extend(try_execute(state, env, &command));
        }
    }

    let still_pending = state
        .unit(id)
        .is_some_and(|u| u.is_alive() && !u.has_acted);
    if still_pending && state.outcome.is_none() {
        events.extend(try_execute(state, env, &PlayerCommand::Wait { unit: id }));
    }
    events
}

/// Enemy commands come from the chooser; a rejected one is simply dropped.
fn try_execute(
    state: &mut EncounterState,
    env: &GameEnv<'_>,
    command: &PlayerCommand,
) -> Vec<GameEvent> {
    match plan::compute(state, env, command) {
        Ok(planned) => commit::apply(state, planned),
        Err(_) => Vec::new(),
    }
}
