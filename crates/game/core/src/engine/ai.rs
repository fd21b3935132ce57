//! Greedy enemy decision-making.
//!
//! The enemy chooser looks one action ahead: pick a target, score every
//! affordable skill over every legal aim cell, and fall back to a basic
//! attack or an approach move. Scoring is deterministic given the encounter
//! seed and nonce.
//!
//! # Skill scoring
//!
//! | Term                                        | Weight            |
//! |---------------------------------------------|-------------------|
//! | damage skill                                | `10 × multiplier` |
//! | damage against a target below 30% HP        | `+15`             |
//! | each target beyond the first                | `+3`              |
//! | heal when an ally is below 50% HP           | `+20`             |
//! | buff none of the targets carries yet        | `+5`              |
//! | debuff                                      | `+6`              |
//! | aim includes the chosen target              | `+5`              |
//! | cost                                        | `-0.1 × cost`     |
//!
//! Only positive scores are considered.

use super::action::PlayerCommand;
use crate::env::{GameEnv, SeedStream};
use crate::grid::{find_path, reachable_cells};
use crate::modifier::{ModifierKind, stable_id};
use crate::skill::{SkillDescriptor, SkillKind, SkillTargets, reachable_skill_cells, skill_targets};
use crate::state::{EncounterState, Position, Unit, UnitId};

/// Seed context for taunt rolls.
const TAUNT_CONTEXT: u32 = 0x7a47;

const LOW_HP_RATIO: f64 = 0.3;
const HEAL_THRESHOLD: f64 = 0.5;

/// Utility of one candidate action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score {
    pub is_possible: bool,
    pub value: f64,
}

impl Score {
    pub fn new(value: f64) -> Self {
        Self {
            is_possible: value > 0.0,
            value,
        }
    }

    pub const fn impossible() -> Self {
        Self {
            is_possible: false,
            value: 0.0,
        }
    }

    /// True when `self` should replace `other` as the best candidate.
    fn beats(&self, other: &Self) -> bool {
        self.is_possible && (!other.is_possible || self.value > other.value)
    }
}

/// Party unit the enemy goes after.
///
/// Taunting units roll first, in roster order; otherwise the nearest living
/// party unit by Manhattan distance, ties broken by roster order.
pub fn pick_target(state: &EncounterState, env: &GameEnv<'_>, enemy: &Unit) -> Option<UnitId> {
    let rng = env.rng();
    let mut seeds = SeedStream::with_context(state.seed, state.nonce, enemy.id, TAUNT_CONTEXT);
    for unit in state.rosters.living_party() {
        let taunt = unit.totals.taunt_chance;
        if taunt > 0.0 && rng.chance(seeds.next_seed(), taunt) {
            return Some(unit.id);
        }
    }

    state
        .rosters
        .living_party()
        .min_by_key(|u| enemy.position.manhattan(u.position))
        .map(|u| u.id)
}

/// Scores one resolved skill use.
pub fn score_skill(
    state: &EncounterState,
    skill: &SkillDescriptor,
    targets: &SkillTargets,
    focus: Option<UnitId>,
) -> Score {
    let units: Vec<&Unit> = targets.units.iter().filter_map(|id| state.unit(*id)).collect();
    if units.is_empty() {
        return Score::impossible();
    }
    let extra_targets = (units.len() - 1) as f64 * 3.0;

    let mut value = match skill.kind {
        kind if kind.deals_damage() => {
            let finisher = units.iter().any(|u| u.hp_ratio() < LOW_HP_RATIO);
            10.0 * skill.damage_multiplier + if finisher { 15.0 } else { 0.0 } + extra_targets
        }
        SkillKind::Heal | SkillKind::Revive => {
            if units.iter().any(|u| u.hp_ratio() < HEAL_THRESHOLD) {
                20.0 + extra_targets
            } else {
                0.0
            }
        }
        SkillKind::Buff => match &skill.buff {
            Some(buff) => {
                let id = stable_id(buff.id.as_ref(), &skill.id, &ModifierKind::Buff.to_string());
                if units.iter().all(|u| !u.buffs.contains(&id)) {
                    5.0 + extra_targets
                } else {
                    0.0
                }
            }
            None => 0.0,
        },
        SkillKind::Debuff => 6.0 + extra_targets,
        _ => 0.0,
    };
    if value <= 0.0 {
        return Score::impossible();
    }

    if focus.is_some_and(|id| targets.units.contains(&id)) {
        value += 5.0;
    }
    value -= 0.1 * f64::from(skill.cost);
    Score::new(value)
}

/// Best skill use or attack available without moving.
pub fn choose_action(
    state: &EncounterState,
    env: &GameEnv<'_>,
    enemy_id: UnitId,
) -> Option<PlayerCommand> {
    let enemy = state.unit(enemy_id).filter(|u| u.is_alive())?;
    let focus = pick_target(state, env, enemy);

    let mut best: Option<(Score, PlayerCommand)> = None;
    for skill in enemy.skills.iter().filter_map(|id| env.skill(id)) {
        if skill.kind == SkillKind::Summon || skill.cost > enemy.mp {
            continue;
        }
        let aims: Vec<Position> = if skill.is_global() {
            vec![enemy.position]
        } else {
            reachable_skill_cells(&state.grid, &state.rosters, enemy, skill)
                .into_keys()
                .collect()
        };
        for aim in aims {
            let Some(targets) = skill_targets(&state.grid, &state.rosters, enemy, skill, aim) else {
                continue;
            };
            let score = score_skill(state, skill, &targets, focus);
            if best
                .as_ref()
                .map_or(score.is_possible, |(current, _)| score.beats(current))
            {
                best = Some((
                    score,
                    PlayerCommand::UseSkill {
                        unit: enemy_id,
                        skill: skill.id.clone(),
                        target: aim,
                    },
                ));
            }
        }
    }
    if let Some((_, command)) = best {
        return Some(command);
    }

    attack_in_reach(state, enemy, focus).map(|target| PlayerCommand::Attack {
        unit: enemy_id,
        target,
    })
}

/// The focus target when it is in attack range, else the nearest party unit
/// that is.
fn attack_in_reach(state: &EncounterState, enemy: &Unit, focus: Option<UnitId>) -> Option<UnitId> {
    let in_reach = |u: &&Unit| enemy.position.chebyshev(u.position) <= enemy.attack_range;
    if let Some(target) = focus.and_then(|id| state.unit(id)).filter(|u| in_reach(u)) {
        return Some(target.id);
    }
    state
        .rosters
        .living_party()
        .filter(in_reach)
        .min_by_key(|u| enemy.position.manhattan(u.position))
        .map(|u| u.id)
}

/// Cell to move to when closing on the focus target.
///
/// Follows the full-length path as far as this turn's move range allows;
/// when no path exists, takes the reachable cell nearest the target if it
/// improves on the current distance.
pub fn choose_approach(
    state: &EncounterState,
    env: &GameEnv<'_>,
    enemy_id: UnitId,
) -> Option<Position> {
    let enemy = state.unit(enemy_id).filter(|u| u.is_alive())?;
    let target = pick_target(state, env, enemy).and_then(|id| state.unit(id))?;
    let range = enemy.effective_move_range();
    let reachable = reachable_cells(&state.grid, &state.rosters, enemy.position, range);
    if reachable.is_empty() {
        return None;
    }

    let limit = state.grid.width().saturating_mul(state.grid.height());
    let path = find_path(&state.grid, &state.rosters, enemy.position, target.position, limit);
    let along_path = path
        .iter()
        .take(path.len().saturating_sub(1))
        .take(range as usize)
        .filter(|cell| reachable.contains_key(cell))
        .last()
        .copied();
    if along_path.is_some() {
        return along_path;
    }

    let current = enemy.position.manhattan(target.position);
    reachable
        .keys()
        .copied()
        .min_by_key(|cell| cell.manhattan(target.position))
        .filter(|cell| cell.manhattan(target.position) < current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SkillOracle;
    use crate::grid::Grid;
    use crate::skill::{RawSkill, SkillId};
    use crate::state::Allegiance;
    use crate::state::testing::template;

    struct OneSkill(SkillDescriptor);

    impl SkillOracle for OneSkill {
        fn skill(&self, id: &SkillId) -> Option<&SkillDescriptor> {
            (self.0.id == *id).then_some(&self.0)
        }
    }

    fn field() -> EncounterState {
        let mut state = EncounterState::new(Grid::open(10, 10), 3);
        state
            .spawn(&template("hero"), Allegiance::Player, Position::new(2, 2))
            .unwrap();
        state
            .spawn(&template("squire"), Allegiance::Ally, Position::new(8, 8))
            .unwrap();
        state
            .spawn(&template("goblin"), Allegiance::Enemy, Position::new(7, 5))
            .unwrap();
        state
    }

    #[test]
    fn nearest_party_unit_is_the_target() {
        let state = field();
        let goblin = state.unit(UnitId(2)).unwrap();
        assert_eq!(pick_target(&state, &GameEnv::empty(), goblin), Some(UnitId(1)));
    }

    #[test]
    fn taunt_overrides_distance() {
        let mut state = field();
        state.unit_mut(UnitId::PLAYER).unwrap().totals.taunt_chance = 1.0;
        let goblin = state.unit(UnitId(2)).unwrap();
        assert_eq!(
            pick_target(&state, &GameEnv::empty(), goblin),
            Some(UnitId::PLAYER)
        );
    }

    #[test]
    fn out_of_reach_enemy_approaches() {
        let state = field();
        let env = GameEnv::empty();
        assert_eq!(choose_action(&state, &env, UnitId(2)), None);

        let cell = choose_approach(&state, &env, UnitId(2)).unwrap();
        let squire = Position::new(8, 8);
        assert!(cell.manhattan(squire) < Position::new(7, 5).manhattan(squire));
        assert_eq!(Position::new(7, 5).manhattan(cell), 3);
    }

    #[test]
    fn adjacent_enemy_attacks() {
        let mut state = field();
        state.unit_mut(UnitId(2)).unwrap().position = Position::new(8, 7);
        assert_eq!(
            choose_action(&state, &GameEnv::empty(), UnitId(2)),
            Some(PlayerCommand::Attack {
                unit: UnitId(2),
                target: UnitId(1),
            })
        );
    }

    #[test]
    fn strong_skill_beats_the_basic_attack() {
        let mut state = field();
        let goblin = state.unit_mut(UnitId(2)).unwrap();
        goblin.position = Position::new(8, 7);
        goblin.skills.push("cleave".into());
        let cleave = OneSkill(SkillDescriptor::canonicalize(RawSkill {
            id: "cleave".into(),
            kind: Some("damage".into()),
            range: Some(1),
            damage_multiplier: Some(2.0),
            ..RawSkill::default()
        }));
        let env = GameEnv::empty().with_skills(&cleave);

        let squire = state.unit(UnitId(1)).unwrap().position;
        let goblin = state.unit(UnitId(2)).unwrap();
        let targets = skill_targets(&state.grid, &state.rosters, goblin, &cleave.0, squire).unwrap();
        assert!(score_skill(&state, &cleave.0, &targets, Some(UnitId(1))).is_possible);

        assert_eq!(
            choose_action(&state, &env, UnitId(2)),
            Some(PlayerCommand::UseSkill {
                unit: UnitId(2),
                skill: "cleave".into(),
                target: squire,
            })
        );
    }

    #[test]
    fn approach_works_on_a_huge_grid() {
        let mut state = EncounterState::new(Grid::open(70_000, 70_000), 3);
        state
            .spawn(&template("hero"), Allegiance::Player, Position::new(2, 2))
            .unwrap();
        let goblin = state
            .spawn(&template("goblin"), Allegiance::Enemy, Position::new(10, 2))
            .unwrap();

        let cell = choose_approach(&state, &GameEnv::empty(), goblin).unwrap();
        assert_eq!(cell.y, 2);
        assert_eq!(Position::new(10, 2).manhattan(cell), 3);
    }
}
