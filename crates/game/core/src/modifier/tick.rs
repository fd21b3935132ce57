//! Phase-boundary processing of timed modifiers.
//!
//! Both passes take the turn that is closing. Modifiers whose `applied_turn`
//! equals that turn were granted during it and are neither decremented nor
//! allowed to deal damage-over-time yet.

use super::{ModifierId, ModifierKind, ModifierPayload, StatusKind};
use crate::config::GameConfig;
use crate::env::RngOracle;
use crate::state::{TurnIndex, Unit};

/// Outcome of [`process_buffs`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuffTick {
    /// Damage-over-time dealt, per debuff.
    pub damage: Vec<(ModifierId, u32)>,
    pub expired: Vec<(ModifierKind, ModifierId)>,
}

/// Outcome of [`process_status_effects`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusTick {
    /// Tick damage dealt, per status.
    pub damage: Vec<(ModifierId, u32)>,
    pub expired: Vec<ModifierId>,
    /// Status that costs the unit its turn, if any.
    pub skip: Option<StatusKind>,
}

impl StatusTick {
    pub fn skip_turn(&self) -> bool {
        self.skip.is_some()
    }
}

fn share_of_max_hp(unit: &Unit, share: f64) -> u32 {
    let amount = (f64::from(unit.max_hp) * share).floor() as u32;
    amount.max(GameConfig::MIN_DAMAGE)
}

/// End-of-turn pass over buffs and debuffs.
///
/// Debuff DoT lands before the decrement. Anything left at zero duration is
/// removed.
pub fn process_buffs(unit: &mut Unit, closing: TurnIndex) -> BuffTick {
    let mut tick = BuffTick::default();

    let dots: Vec<(ModifierId, f64)> = unit
        .debuffs
        .iter()
        .filter(|m| m.applied_turn != closing)
        .filter_map(|m| match &m.payload {
            ModifierPayload::Stats(p) if p.dot_percent > 0.0 => Some((m.id.clone(), p.dot_percent)),
            _ => None,
        })
        .collect();
    for (id, share) in dots {
        if !unit.is_alive() {
            break;
        }
        let amount = share_of_max_hp(unit, share);
        unit.hp = unit.hp.saturating_sub(amount);
        tick.damage.push((id, amount));
    }

    for kind in [ModifierKind::Buff, ModifierKind::Debuff] {
        let set = unit.modifiers_mut(kind);
        for modifier in set.iter_mut() {
            if modifier.applied_turn != closing {
                modifier.duration = modifier.duration.saturating_sub(1);
            }
        }
        tick.expired
            .extend(set.drain_expired().into_iter().map(|id| (kind, id)));
    }

    tick
}

/// Turn-start pass over status effects.
///
/// Ticking statuses deal their share of max HP, then durations are
/// decremented under the grant-turn exemption. The skip decision is taken
/// over the statuses still active afterwards, so a one-turn stun costs
/// exactly one turn.
pub fn process_status_effects(
    unit: &mut Unit,
    closing: TurnIndex,
    rng: &dyn RngOracle,
    seed: u64,
) -> StatusTick {
    let mut tick = StatusTick::default();

    let ticking: Vec<(ModifierId, f64)> = unit
        .statuses
        .iter()
        .filter_map(|m| match &m.payload {
            ModifierPayload::Status { kind, potency } => kind
                .default_tick()
                .map(|default| (m.id.clone(), potency.unwrap_or(default))),
            ModifierPayload::Stats(_) => None,
        })
        .collect();
    for (id, share) in ticking {
        if !unit.is_alive() {
            break;
        }
        let amount = share_of_max_hp(unit, share);
        unit.hp = unit.hp.saturating_sub(amount);
        tick.damage.push((id, amount));
    }

    for modifier in unit.statuses.iter_mut() {
        if modifier.applied_turn != closing {
            modifier.duration = modifier.duration.saturating_sub(1);
        }
    }
    tick.expired = unit.statuses.drain_expired();

    if !unit.is_alive() {
        return tick;
    }

    let mut paralyzed = false;
    for modifier in unit.statuses.iter() {
        match modifier.payload.status_kind() {
            Some(kind) if kind.always_skips() => {
                tick.skip = Some(kind);
                return tick;
            }
            Some(StatusKind::Paralyze) => paralyzed = true,
            _ => {}
        }
    }
    if paralyzed && rng.chance(seed, GameConfig::PARALYZE_SKIP_CHANCE) {
        tick.skip = Some(StatusKind::Paralyze);
    }

    tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{LuckyRng, NeutralRng};
    use crate::modifier::{
        ModifierSpec, StatPayload, StatusSpec, apply_buff, apply_debuff, apply_status,
    };
    use crate::skill::SkillId;
    use crate::state::testing::unit;

    fn spec(duration: u32) -> ModifierSpec {
        ModifierSpec {
            id: None,
            duration,
            payload: StatPayload::default(),
        }
    }

    fn status(kind: StatusKind, duration: u32) -> StatusSpec {
        StatusSpec {
            id: None,
            kind,
            duration,
            chance: 1.0,
            potency: None,
        }
    }

    #[test]
    fn buff_survives_the_turn_after_its_grant() {
        let mut target = unit(1);
        apply_buff(&mut target, &spec(1), &SkillId::from("haste"), None, TurnIndex(1));

        // Player phase 2 opens: turn 1 closes, grant turn is exempt.
        assert!(process_buffs(&mut target, TurnIndex(1)).expired.is_empty());
        assert_eq!(target.buffs.len(), 1);

        // Player phase 3 opens: turn 2 closes, buff expires.
        let tick = process_buffs(&mut target, TurnIndex(2));
        assert_eq!(
            tick.expired,
            vec![(ModifierKind::Buff, ModifierId::from("haste:buff"))]
        );
        assert!(target.buffs.is_empty());
    }

    #[test]
    fn two_turn_buff_present_on_turns_two_and_three() {
        let mut target = unit(1);
        apply_buff(&mut target, &spec(2), &SkillId::from("bless"), None, TurnIndex(1));

        process_buffs(&mut target, TurnIndex(1));
        assert_eq!(target.buffs.len(), 1, "turn 2 start");
        process_buffs(&mut target, TurnIndex(2));
        assert_eq!(target.buffs.len(), 1, "turn 3 start");
        process_buffs(&mut target, TurnIndex(3));
        assert!(target.buffs.is_empty(), "turn 4 start");
    }

    #[test]
    fn dot_skips_the_application_turn() {
        let mut target = unit(1);
        let max_hp = target.max_hp;
        let bleed = ModifierSpec {
            payload: StatPayload {
                dot_percent: 0.1,
                ..StatPayload::default()
            },
            ..spec(3)
        };
        apply_debuff(&mut target, &bleed, &SkillId::from("rend"), None, TurnIndex(1));

        assert!(process_buffs(&mut target, TurnIndex(1)).damage.is_empty());
        assert_eq!(target.hp, max_hp);

        let tick = process_buffs(&mut target, TurnIndex(2));
        assert_eq!(tick.damage.len(), 1);
        assert_eq!(target.hp, max_hp - max_hp / 10);
    }

    #[test]
    fn one_turn_stun_skips_exactly_one_turn() {
        let mut target = unit(1);
        let skill = SkillId::from("bash");
        apply_status(
            &mut target,
            &status(StatusKind::Stun, 1),
            &skill,
            None,
            TurnIndex(1),
            &NeutralRng,
            0,
        );

        let first = process_status_effects(&mut target, TurnIndex(1), &NeutralRng, 0);
        assert_eq!(first.skip, Some(StatusKind::Stun));

        let second = process_status_effects(&mut target, TurnIndex(2), &NeutralRng, 0);
        assert!(!second.skip_turn());
        assert_eq!(second.expired, vec![ModifierId::from("bash:stun")]);
    }

    #[test]
    fn poison_ticks_share_of_max_hp() {
        let mut target = unit(1);
        let max_hp = target.max_hp;
        apply_status(
            &mut target,
            &status(StatusKind::Poison, 2),
            &SkillId::from("venom"),
            None,
            TurnIndex(1),
            &NeutralRng,
            0,
        );

        let tick = process_status_effects(&mut target, TurnIndex(1), &NeutralRng, 0);
        let expected = (f64::from(max_hp) * GameConfig::POISON_TICK).floor() as u32;
        assert_eq!(tick.damage, vec![(ModifierId::from("venom:poison"), expected)]);
        assert_eq!(target.hp, max_hp - expected);
        assert!(!tick.skip_turn());
    }

    #[test]
    fn paralyze_rolls_for_the_skip() {
        let paralyzed = || {
            let mut target = unit(1);
            apply_status(
                &mut target,
                &status(StatusKind::Paralyze, 3),
                &SkillId::from("shock"),
                None,
                TurnIndex(1),
                &NeutralRng,
                0,
            );
            target
        };

        let mut lucky = paralyzed();
        assert!(process_status_effects(&mut lucky, TurnIndex(2), &LuckyRng, 0).skip_turn());

        let mut neutral = paralyzed();
        assert!(!process_status_effects(&mut neutral, TurnIndex(2), &NeutralRng, 0).skip_turn());
    }
}
