//! Damage calculation.

use crate::config::GameConfig;
use crate::skill::SkillKind;
use crate::stats::CombatStats;

/// Whether a hit is mitigated by defense or magic defense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    Physical,
    Magic,
}

impl DamageType {
    pub const fn of(kind: SkillKind) -> Self {
        if kind.is_magic() { Self::Magic } else { Self::Physical }
    }
}

/// Attack stat a skill kind scales from.
///
/// Magic uses magic attack; ranged uses ranged attack when it is positive and
/// falls back to melee attack otherwise.
pub fn base_damage(stats: &CombatStats, kind: SkillKind) -> i32 {
    match kind {
        SkillKind::Magic => stats.magic_attack,
        SkillKind::Ranged if stats.ranged_attack > 0 => stats.ranged_attack,
        _ => stats.attack,
    }
}

/// Inputs of a single hit after all rolls have been made.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageInput {
    /// Attack stat of the actor.
    pub base: i32,
    /// Skill multiplier share for this hit (`1.0` for basic attacks).
    pub multiplier: f64,
    /// Variance roll in percent.
    pub variance_percent: u32,
    pub critical: bool,
    /// Target defense or magic defense.
    pub defense: i32,
    /// Share of `defense` subtracted.
    pub defense_ratio: f64,
    /// Actor's aggregate damage-dealt multiplier.
    pub dealt: f64,
    /// Target's aggregate damage-taken multiplier.
    pub taken: f64,
    /// Element affinity multiplier, applied last.
    pub element: f64,
}

/// Computes the damage of one hit.
///
/// # Formula
///
/// ```text
/// raw       = base × multiplier × variance%
/// raw       = raw × 1.5                      (critical)
/// mitigated = max(floor(raw − defense × ratio), 1)
/// damage    = max(floor(mitigated × dealt × taken × element), 1)
/// ```
pub fn calculate_damage(input: &DamageInput) -> u32 {
    let mut raw = f64::from(input.base.max(0))
        * input.multiplier
        * f64::from(input.variance_percent)
        / 100.0;
    if input.critical {
        raw *= GameConfig::CRIT_MULTIPLIER;
    }

    let floor = f64::from(GameConfig::MIN_DAMAGE);
    let mitigated = (raw - f64::from(input.defense.max(0)) * input.defense_ratio)
        .floor()
        .max(floor);
    let scaled = (mitigated * input.dealt * input.taken * input.element)
        .floor()
        .max(floor);

    scaled as u32
}
