//! Hit resolution against live units.

use super::damage::{DamageInput, DamageType, base_damage, calculate_damage};
use super::hit::{crit_chance, roll_critical, roll_parry};
use crate::config::GameConfig;
use crate::env::{GameEnv, SeedStream};
use crate::skill::{SkillDescriptor, SkillKind};
use crate::state::Unit;

/// Outcome of one hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitResult {
    /// Computed damage, reported even when parried.
    pub amount: u32,
    pub critical: bool,
    /// Parried: `amount` is not applied.
    pub defended: bool,
}

impl HitResult {
    /// Damage that actually reaches the target.
    pub fn applied(&self) -> u32 {
        if self.defended { 0 } else { self.amount }
    }
}

struct HitProfile {
    kind: SkillKind,
    multiplier: f64,
    variance: (u32, u32),
    /// Share of physical defense subtracted.
    defense_ratio: f64,
    element: f64,
}

fn resolve_hit(
    actor: &Unit,
    target: &Unit,
    profile: &HitProfile,
    env: &GameEnv<'_>,
    seeds: &mut SeedStream,
) -> HitResult {
    let rng = env.rng();
    let damage_type = DamageType::of(profile.kind);
    let (defense, defense_ratio) = match damage_type {
        DamageType::Magic => (
            target.stats.magic_defense,
            GameConfig::SKILL_MAGIC_DEFENSE_RATIO,
        ),
        DamageType::Physical => (target.stats.defense, profile.defense_ratio),
    };

    let (low, high) = profile.variance;
    let variance_percent = rng.variance_percent(seeds.next_seed(), low, high);
    let chance = crit_chance(actor.stats.crit, actor.totals.crit_bonus);
    let critical = roll_critical(rng, seeds.next_seed(), chance);

    let amount = calculate_damage(&DamageInput {
        base: base_damage(&actor.stats, profile.kind),
        multiplier: profile.multiplier,
        variance_percent,
        critical,
        defense,
        defense_ratio,
        dealt: actor.totals.damage_dealt,
        taken: target.totals.damage_taken,
        element: profile.element,
    });

    let parry_seed = seeds.next_seed();
    let defended = damage_type == DamageType::Physical
        && roll_parry(rng, parry_seed, target.totals.parry_chance);

    HitResult {
        amount,
        critical,
        defended,
    }
}

/// Basic attack. Units with an attack range above one shoot with their
/// ranged attack when they have one.
pub fn resolve_attack(
    actor: &Unit,
    target: &Unit,
    env: &GameEnv<'_>,
    seeds: &mut SeedStream,
) -> HitResult {
    let profile = HitProfile {
        kind: if actor.attack_range > 1 {
            SkillKind::Ranged
        } else {
            SkillKind::Damage
        },
        multiplier: 1.0,
        variance: GameConfig::ATTACK_VARIANCE,
        defense_ratio: GameConfig::ATTACK_DEFENSE_RATIO,
        element: env.element_multiplier(actor.element, target.element),
    };
    resolve_hit(actor, target, &profile, env, seeds)
}

/// Every hit of a damage skill against one target.
///
/// The skill multiplier is split evenly across hits; each hit rolls its own
/// variance, crit and parry.
pub fn resolve_skill_hits(
    actor: &Unit,
    target: &Unit,
    skill: &SkillDescriptor,
    env: &GameEnv<'_>,
    seeds: &mut SeedStream,
) -> Vec<HitResult> {
    let hits = skill.hits.max(1);
    let element = skill.element.unwrap_or(actor.element);
    let profile = HitProfile {
        kind: skill.kind,
        multiplier: skill.damage_multiplier / f64::from(hits),
        variance: GameConfig::SKILL_VARIANCE,
        defense_ratio: GameConfig::SKILL_DEFENSE_RATIO,
        element: env.element_multiplier(element, target.element),
    };
    (0..hits)
        .map(|_| resolve_hit(actor, target, &profile, env, seeds))
        .collect()
}
