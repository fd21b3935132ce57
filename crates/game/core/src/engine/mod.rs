//! Turn scheduling and action execution pipeline.
//!
//! The [`TurnEngine`] is the authoritative reducer for [`EncounterState`].
//! Commands go through two halves: [`TurnEngine::compute`] validates and
//! resolves every roll without touching the state, and
//! [`TurnEngine::commit`] applies the planned result. A presentation layer
//! may hold a plan until its impact frame; [`TurnEngine::execute`] runs both
//! back to back.

mod action;
mod ai;
mod commit;
mod enemy;
mod errors;
mod phase;
mod plan;

pub use action::{Effect, PlannedAction, PlayerCommand};
pub use ai::{Score, choose_action, choose_approach, pick_target, score_skill};
pub use errors::ActionError;

use crate::env::GameEnv;
use crate::event::GameEvent;
use crate::state::{EncounterState, Phase};

/// Game engine that validates commands and drives phase transitions.
pub struct TurnEngine<'a> {
    state: &'a mut EncounterState,
    auto_end_phase: bool,
}

impl<'a> TurnEngine<'a> {
    /// Creates an engine that ends the player phase once every living party
    /// unit has acted.
    pub fn new(state: &'a mut EncounterState) -> Self {
        Self {
            state,
            auto_end_phase: true,
        }
    }

    pub fn with_auto_end_phase(mut self, enabled: bool) -> Self {
        self.auto_end_phase = enabled;
        self
    }

    pub fn state(&self) -> &EncounterState {
        self.state
    }

    /// Validates `command` and resolves its outcome. Never mutates.
    pub fn compute(
        &self,
        env: GameEnv<'_>,
        command: &PlayerCommand,
    ) -> Result<PlannedAction, ActionError> {
        plan::compute(self.state, &env, command)
    }

    /// Applies a plan produced by [`Self::compute`] on the same state.
    pub fn commit(&mut self, env: GameEnv<'_>, planned: PlannedAction) -> Vec<GameEvent> {
        if matches!(planned, PlannedAction::EndPhase) {
            return self.end_player_phase(env);
        }

        let party_action = self.state.turn.phase == Phase::Player;
        let mut events = commit::apply(self.state, planned);
        if party_action && self.auto_end_phase && self.party_done() {
            events.extend(self.end_player_phase(env));
        }
        events
    }

    /// Computes and commits `command`.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        command: &PlayerCommand,
    ) -> Result<Vec<GameEvent>, ActionError> {
        let planned = self.compute(env, command)?;
        Ok(self.commit(env, planned))
    }

    /// Opens a fresh encounter on the current rosters.
    pub fn start_encounter(&mut self) -> Vec<GameEvent> {
        phase::start_encounter(self.state)
    }

    /// Runs the enemy phase and opens the next player phase.
    ///
    /// Repeats while auto-ending is on and status effects leave no party
    /// unit able to act, so the machine never waits on an impossible phase.
    pub fn end_player_phase(&mut self, env: GameEnv<'_>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        loop {
            events.extend(phase::end_player_phase(self.state, &env));
            if !(self.auto_end_phase && self.party_done()) {
                return events;
            }
        }
    }

    /// Player phase in progress with no living party unit left to act.
    fn party_done(&self) -> bool {
        self.state.turn.phase == Phase::Player
            && self.state.outcome.is_none()
            && self.state.rosters.living_party().all(|u| u.has_acted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::env::{NeutralRng, SkillOracle, UnitCatalog};
    use crate::grid::Grid;
    use crate::modifier::{ModifierKind, ModifierSpec, StatPayload, StatusKind, StatusSpec};
    use crate::skill::{HealSpec, RawSkill, SkillDescriptor, SkillId};
    use crate::state::testing::template;
    use crate::state::{Allegiance, EncounterOutcome, Position, TurnIndex, UnitId, UnitTemplate};

    struct Skills(HashMap<SkillId, SkillDescriptor>);

    impl Skills {
        fn new(raw: impl IntoIterator<Item = RawSkill>) -> Self {
            Self(
                raw.into_iter()
                    .map(SkillDescriptor::canonicalize)
                    .map(|s| (s.id.clone(), s))
                    .collect(),
            )
        }
    }

    impl SkillOracle for Skills {
        fn skill(&self, id: &SkillId) -> Option<&SkillDescriptor> {
            self.0.get(id)
        }
    }

    struct Templates(UnitTemplate);

    impl UnitCatalog for Templates {
        fn template(&self, name: &str) -> Option<&UnitTemplate> {
            (self.0.name == name).then_some(&self.0)
        }
    }

    fn stun() -> StatusSpec {
        StatusSpec {
            id: None,
            kind: StatusKind::Stun,
            duration: 1,
            chance: 1.0,
            potency: None,
        }
    }

    /// Heal, summon, area and ally-buff skills, taught to the hero on demand.
    fn support_catalog() -> Skills {
        Skills::new([
            RawSkill {
                id: "mend".into(),
                kind: Some("heal".into()),
                range: Some(2),
                heal: Some(HealSpec {
                    percent: 0.5,
                    magic_scaling: 0.0,
                }),
                ..RawSkill::default()
            },
            RawSkill {
                id: "call_wisp".into(),
                range: Some(1),
                summon: Some("wisp".into()),
                ..RawSkill::default()
            },
            RawSkill {
                id: "meteor".into(),
                kind: Some("magic".into()),
                range: Some(4),
                aoe_radius: Some(1),
                damage_multiplier: Some(2.0),
                ..RawSkill::default()
            },
            RawSkill {
                id: "blessing".into(),
                kind: Some("buff".into()),
                shape: Some("ally".into()),
                range: Some(1),
                buff: Some(ModifierSpec {
                    id: None,
                    duration: 2,
                    payload: StatPayload {
                        defense_percent: 10,
                        ..StatPayload::default()
                    },
                }),
                statuses: vec![stun()],
                ..RawSkill::default()
            },
        ])
    }

    fn teach(state: &mut EncounterState, skill: &str) {
        state.unit_mut(UnitId::PLAYER).unwrap().skills.push(skill.into());
    }

    fn catalog() -> Skills {
        Skills::new([
            RawSkill {
                id: "fire_bolt".into(),
                kind: Some("magic".into()),
                range: Some(4),
                damage_multiplier: Some(1.5),
                cost: 10,
                ..RawSkill::default()
            },
            RawSkill {
                id: "war_cry".into(),
                kind: Some("buff".into()),
                shape: Some("self".into()),
                buff: Some(ModifierSpec {
                    id: None,
                    duration: 2,
                    payload: StatPayload {
                        attack_percent: 20,
                        ..StatPayload::default()
                    },
                }),
                ..RawSkill::default()
            },
            RawSkill {
                id: "shield_bash".into(),
                kind: Some("damage".into()),
                range: Some(1),
                statuses: vec![stun()],
                ..RawSkill::default()
            },
        ])
    }

    fn encounter() -> EncounterState {
        let mut state = EncounterState::new(Grid::open(8, 8), 11);
        let mut hero = template("hero");
        hero.skills = vec!["fire_bolt".into(), "war_cry".into(), "shield_bash".into()];
        state
            .spawn(&hero, Allegiance::Player, Position::new(2, 2))
            .unwrap();
        state
            .spawn(&template("slime"), Allegiance::Enemy, Position::new(7, 7))
            .unwrap();
        state
    }

    #[test]
    fn rejected_command_leaves_state_untouched() {
        let mut state = encounter();
        let skills = catalog();
        let env = GameEnv::empty().with_skills(&skills);
        let mut engine = TurnEngine::new(&mut state);
        engine.start_encounter();
        let before = engine.state().clone();

        let far = PlayerCommand::Attack {
            unit: UnitId::PLAYER,
            target: UnitId(1),
        };
        assert!(matches!(
            engine.execute(env, &far),
            Err(ActionError::OutOfRange { distance: 5, .. })
        ));
        let wall = PlayerCommand::Move {
            unit: UnitId::PLAYER,
            to: Position::new(9, 9),
        };
        assert!(matches!(
            engine.execute(env, &wall),
            Err(ActionError::Unreachable { .. })
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn move_then_no_second_move() {
        let mut state = encounter();
        let env = GameEnv::empty();
        let mut engine = TurnEngine::new(&mut state);
        engine.start_encounter();

        let events = engine
            .execute(
                env,
                &PlayerCommand::Move {
                    unit: UnitId::PLAYER,
                    to: Position::new(4, 3),
                },
            )
            .unwrap();
        assert!(matches!(events[0], GameEvent::UnitMoved { to, .. } if to == Position::new(4, 3)));
        assert_eq!(engine.state().nonce, 1);

        let again = PlayerCommand::Move {
            unit: UnitId::PLAYER,
            to: Position::new(4, 4),
        };
        assert_eq!(
            engine.execute(env, &again),
            Err(ActionError::AlreadyMoved(UnitId::PLAYER))
        );
    }

    #[test]
    fn skill_cost_is_paid_and_enemy_phase_follows() {
        let mut state = encounter();
        let skills = catalog();
        let rng = NeutralRng;
        let env = GameEnv::empty().with_skills(&skills).with_rng(&rng);
        let mut engine = TurnEngine::new(&mut state);
        engine.start_encounter();
        let mp = engine.state().unit(UnitId::PLAYER).unwrap().mp;

        let events = engine
            .execute(
                env,
                &PlayerCommand::UseSkill {
                    unit: UnitId::PLAYER,
                    skill: "fire_bolt".into(),
                    target: Position::new(2, 6),
                },
            )
            .unwrap();

        // The only party unit acted, so the enemy phase ran and turn two began.
        assert!(events.contains(&GameEvent::PhaseChanged { phase: Phase::Enemy }));
        assert!(events.contains(&GameEvent::TurnChanged { turn: TurnIndex(2) }));
        let state = engine.state();
        assert_eq!(state.turn.phase, Phase::Player);
        assert!(state.turn.acted.is_empty());
        assert_eq!(state.unit(UnitId::PLAYER).unwrap().mp, mp - 10);
        state.check_invariants().unwrap();
    }

    #[test]
    fn self_buff_lasts_two_player_turns() {
        let mut state = encounter();
        let skills = catalog();
        let env = GameEnv::empty().with_skills(&skills);
        let mut engine = TurnEngine::new(&mut state).with_auto_end_phase(false);
        engine.start_encounter();
        let attack = engine.state().unit(UnitId::PLAYER).unwrap().stats.attack;

        engine
            .execute(
                env,
                &PlayerCommand::UseSkill {
                    unit: UnitId::PLAYER,
                    skill: "war_cry".into(),
                    target: Position::new(2, 2),
                },
            )
            .unwrap();
        let hero = engine.state().unit(UnitId::PLAYER).unwrap();
        assert_eq!(hero.stats.attack, attack * 120 / 100);
        assert_eq!(hero.buffs.len(), 1);

        engine.execute(env, &PlayerCommand::EndPhase).unwrap();
        let buff = engine.state().unit(UnitId::PLAYER).unwrap().buffs.iter().next().cloned();
        assert_eq!(buff.map(|b| b.duration), Some(2));

        let events = engine.execute(env, &PlayerCommand::EndPhase).unwrap();
        assert_eq!(engine.state().unit(UnitId::PLAYER).unwrap().buffs.len(), 1);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ModifierExpired { .. })));

        let events = engine.execute(env, &PlayerCommand::EndPhase).unwrap();
        assert!(events.contains(&GameEvent::ModifierExpired {
            unit: UnitId::PLAYER,
            id: "war_cry:buff".into(),
            kind: ModifierKind::Buff,
        }));
        let hero = engine.state().unit(UnitId::PLAYER).unwrap();
        assert!(hero.buffs.is_empty());
        assert_eq!(hero.stats.attack, attack);
    }

    #[test]
    fn stunned_enemy_loses_its_next_turn() {
        let mut state = encounter();
        state.unit_mut(UnitId(1)).unwrap().position = Position::new(3, 2);
        let skills = catalog();
        let rng = NeutralRng;
        let env = GameEnv::empty().with_skills(&skills).with_rng(&rng);
        let mut engine = TurnEngine::new(&mut state).with_auto_end_phase(false);
        engine.start_encounter();

        engine
            .execute(
                env,
                &PlayerCommand::UseSkill {
                    unit: UnitId::PLAYER,
                    skill: "shield_bash".into(),
                    target: Position::new(3, 2),
                },
            )
            .unwrap();
        assert!(engine.state().unit(UnitId(1)).unwrap().statuses.has_status(StatusKind::Stun));

        // Granted this turn: the slime still fights back during turn one.
        engine.execute(env, &PlayerCommand::EndPhase).unwrap();
        // Turn two opened with the stun still active.
        let events = engine.execute(env, &PlayerCommand::EndPhase).unwrap();
        assert!(!events.iter().any(|e| matches!(
            e,
            GameEvent::DamageApplied { source: Some(UnitId(1)), .. }
        )));
        assert!(engine.state().unit(UnitId(1)).unwrap().statuses.is_empty());
    }

    #[test]
    fn killing_the_last_enemy_enters_free_roam() {
        let mut state = encounter();
        state.unit_mut(UnitId(1)).unwrap().position = Position::new(3, 2);
        let rng = NeutralRng;
        let env = GameEnv::empty().with_rng(&rng);
        let mut engine = TurnEngine::new(&mut state);
        engine.start_encounter();
        engine.state.unit_mut(UnitId(1)).unwrap().hp = 1;

        let events = engine
            .execute(
                env,
                &PlayerCommand::Attack {
                    unit: UnitId::PLAYER,
                    target: UnitId(1),
                },
            )
            .unwrap();
        assert!(events.contains(&GameEvent::UnitDied { unit: UnitId(1) }));
        assert!(events.contains(&GameEvent::EncounterEnded {
            outcome: EncounterOutcome::Victory
        }));
        assert_eq!(engine.state().turn.phase, Phase::FreeRoam);

        assert_eq!(
            engine.execute(env, &PlayerCommand::Wait { unit: UnitId::PLAYER }),
            Err(ActionError::NotInCombat)
        );
        assert!(
            engine
                .execute(
                    env,
                    &PlayerCommand::Move {
                        unit: UnitId::PLAYER,
                        to: Position::new(2, 4),
                    },
                )
                .is_ok()
        );
    }

    #[test]
    fn free_control_ignores_acted_flags() {
        let mut state = encounter();
        state.turn.free_control = true;
        let env = GameEnv::empty();
        let mut engine = TurnEngine::new(&mut state).with_auto_end_phase(false);
        engine.start_encounter();

        for to in [Position::new(3, 2), Position::new(4, 2)] {
            engine
                .execute(
                    env,
                    &PlayerCommand::Move {
                        unit: UnitId::PLAYER,
                        to,
                    },
                )
                .unwrap();
        }
        assert_eq!(engine.state().unit(UnitId::PLAYER).unwrap().position, Position::new(4, 2));
    }

    #[test]
    fn heal_is_clamped_to_max_hp() {
        let mut state = encounter();
        teach(&mut state, "mend");
        let skills = support_catalog();
        let env = GameEnv::empty().with_skills(&skills);
        let mut engine = TurnEngine::new(&mut state).with_auto_end_phase(false);
        engine.start_encounter();
        let hero = engine.state.unit_mut(UnitId::PLAYER).unwrap();
        hero.hp = hero.max_hp - 5;
        let max_hp = hero.max_hp;

        let events = engine
            .execute(
                env,
                &PlayerCommand::UseSkill {
                    unit: UnitId::PLAYER,
                    skill: "mend".into(),
                    target: Position::new(2, 2),
                },
            )
            .unwrap();
        assert!(events.contains(&GameEvent::Healed {
            source: UnitId::PLAYER,
            target: UnitId::PLAYER,
            amount: 5,
        }));
        assert_eq!(engine.state().unit(UnitId::PLAYER).unwrap().hp, max_hp);
    }

    #[test]
    fn summon_fills_a_free_adjacent_cell() {
        let mut state = encounter();
        teach(&mut state, "call_wisp");
        let skills = support_catalog();
        let wisp = Templates(template("wisp"));
        let env = GameEnv::empty().with_skills(&skills).with_units(&wisp);
        let mut engine = TurnEngine::new(&mut state).with_auto_end_phase(false);
        engine.start_encounter();
        let id = engine.state().peek_unit_id();

        let events = engine
            .execute(
                env,
                &PlayerCommand::UseSkill {
                    unit: UnitId::PLAYER,
                    skill: "call_wisp".into(),
                    target: Position::new(2, 3),
                },
            )
            .unwrap();
        assert!(events.contains(&GameEvent::UnitSummoned {
            unit: id,
            summoner: UnitId::PLAYER,
            template: "wisp".to_string(),
            position: Position::new(2, 3),
        }));
        let summoned = engine.state().unit(id).unwrap();
        assert_eq!(summoned.allegiance, Allegiance::Summon);
        assert_eq!(summoned.position, Position::new(2, 3));
        engine.state().check_invariants().unwrap();
    }

    #[test]
    fn summon_onto_a_taken_cell_is_rejected() {
        let mut state = encounter();
        teach(&mut state, "call_wisp");
        state.unit_mut(UnitId(1)).unwrap().position = Position::new(3, 2);
        let skills = support_catalog();
        let wisp = Templates(template("wisp"));
        let env = GameEnv::empty().with_skills(&skills).with_units(&wisp);
        let mut engine = TurnEngine::new(&mut state).with_auto_end_phase(false);
        engine.start_encounter();
        let before = engine.state().clone();

        assert!(matches!(
            engine.execute(
                env,
                &PlayerCommand::UseSkill {
                    unit: UnitId::PLAYER,
                    skill: "call_wisp".into(),
                    target: Position::new(3, 2),
                },
            ),
            Err(ActionError::InvalidTarget { .. })
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn area_skill_kills_every_enemy_it_covers() {
        let mut state = encounter();
        teach(&mut state, "meteor");
        state.unit_mut(UnitId(1)).unwrap().position = Position::new(5, 2);
        let bat = state
            .spawn(&template("bat"), Allegiance::Enemy, Position::new(6, 2))
            .unwrap();
        for id in [UnitId(1), bat] {
            state.unit_mut(id).unwrap().hp = 1;
        }
        let skills = support_catalog();
        let rng = NeutralRng;
        let env = GameEnv::empty().with_skills(&skills).with_rng(&rng);
        let mut engine = TurnEngine::new(&mut state);
        engine.start_encounter();

        let events = engine
            .execute(
                env,
                &PlayerCommand::UseSkill {
                    unit: UnitId::PLAYER,
                    skill: "meteor".into(),
                    target: Position::new(5, 2),
                },
            )
            .unwrap();
        assert!(events.contains(&GameEvent::UnitDied { unit: UnitId(1) }));
        assert!(events.contains(&GameEvent::UnitDied { unit: bat }));
        assert!(events.contains(&GameEvent::EncounterEnded {
            outcome: EncounterOutcome::Victory
        }));
        let state = engine.state();
        assert!(state.rosters.enemies.is_empty());
        state.check_invariants().unwrap();
    }

    #[test]
    fn ally_buff_skips_its_statuses() {
        let mut state = encounter();
        teach(&mut state, "blessing");
        let skills = support_catalog();
        let rng = NeutralRng;
        let env = GameEnv::empty().with_skills(&skills).with_rng(&rng);
        let mut engine = TurnEngine::new(&mut state).with_auto_end_phase(false);
        engine.start_encounter();

        engine
            .execute(
                env,
                &PlayerCommand::UseSkill {
                    unit: UnitId::PLAYER,
                    skill: "blessing".into(),
                    target: Position::new(2, 2),
                },
            )
            .unwrap();
        let hero = engine.state().unit(UnitId::PLAYER).unwrap();
        assert_eq!(hero.buffs.len(), 1);
        assert!(hero.statuses.is_empty());
    }
}
