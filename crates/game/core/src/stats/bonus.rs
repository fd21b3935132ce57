//! Modifier aggregation.
//!
//! Flat deltas from every active buff and debuff are added to the
//! recalculated stat first; the summed percentage applies to that total.

use super::core::Attributes;
use super::derived::{CombatStats, StatDeltas};
use crate::modifier::{ModifierPayload, TimedModifier};

/// Modifiers on one stat: a flat delta, then a percentage on the sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Adjustment {
    pub flat: i32,
    /// Whole percent, `20` is +20%.
    pub percent: i32,
}

impl Adjustment {
    pub const fn new(flat: i32, percent: i32) -> Self {
        Self { flat, percent }
    }

    /// `clamp((base + flat) * (100 + percent) / 100)`, rounding toward
    /// negative infinity.
    ///
    /// ```
    /// # use tactics_core::stats::{Adjustment, StatBounds};
    /// assert_eq!(Adjustment::new(10, 50).apply(90, StatBounds::COMBAT_STATS), 150);
    /// ```
    pub fn apply(self, base: i32, bounds: StatBounds) -> i32 {
        let summed = base + self.flat;
        let scaled = match self.percent {
            0 => summed,
            p => (summed * (100 + p)).div_euclid(100),
        };
        scaled.clamp(bounds.min, bounds.max)
    }
}

/// Inclusive range a computed stat is clamped into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    pub const ATTRIBUTES: Self = Self { min: 0, max: 999 };
    pub const COMBAT_STATS: Self = Self { min: 0, max: 99_999 };
    /// Max HP and max MP never drop below 1.
    pub const RESOURCE_MAXIMUMS: Self = Self {
        min: 1,
        max: 999_999,
    };
}

/// Aggregate of every active buff and debuff on a unit.
///
/// Recomputed by [`super::recalculate_stats`] and cached on the unit so
/// combat resolution and the enemy chooser can read multipliers, crit bonus,
/// parry and taunt chance without walking the modifier lists again.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierTotals {
    pub attributes: Attributes,
    pub flat: StatDeltas,
    pub attack_percent: i32,
    pub magic_attack_percent: i32,
    pub defense_percent: i32,
    /// Product of every "damage dealt" multiplier.
    pub damage_dealt: f64,
    /// Product of every "damage taken" multiplier.
    pub damage_taken: f64,
    pub crit_bonus: i32,
    /// Parry probability in [0, 1].
    pub parry_chance: f64,
    /// Taunt probability in [0, 1].
    pub taunt_chance: f64,
    pub move_bonus: i32,
}

impl Default for ModifierTotals {
    fn default() -> Self {
        Self {
            attributes: Attributes::ZERO,
            flat: StatDeltas::default(),
            attack_percent: 0,
            magic_attack_percent: 0,
            defense_percent: 0,
            damage_dealt: 1.0,
            damage_taken: 1.0,
            crit_bonus: 0,
            parry_chance: 0.0,
            taunt_chance: 0.0,
            move_bonus: 0,
        }
    }
}

impl ModifierTotals {
    /// Sums every stat payload; status payloads carry no stat deltas.
    pub fn collect<'a>(modifiers: impl IntoIterator<Item = &'a TimedModifier>) -> Self {
        let mut totals = Self::default();
        for modifier in modifiers {
            let ModifierPayload::Stats(payload) = &modifier.payload else {
                continue;
            };
            totals.attributes = totals.attributes.plus(&payload.attributes);
            totals.flat.accumulate(&payload.stats);
            totals.attack_percent += payload.attack_percent;
            totals.magic_attack_percent += payload.magic_attack_percent;
            totals.defense_percent += payload.defense_percent;
            totals.damage_dealt *= payload.damage_dealt;
            totals.damage_taken *= payload.damage_taken;
            totals.crit_bonus += payload.crit_bonus;
            totals.parry_chance += payload.parry_chance;
            totals.taunt_chance += payload.taunt_chance;
            totals.move_bonus += payload.move_bonus;
        }
        totals.parry_chance = totals.parry_chance.clamp(0.0, 1.0);
        totals.taunt_chance = totals.taunt_chance.clamp(0.0, 1.0);
        totals
    }

    /// Layers flat deltas and then percentage bonuses on top of base stats.
    pub fn apply_to(&self, base: CombatStats) -> CombatStats {
        let stat = |value: i32, flat: i32, percent: i32| {
            Adjustment::new(flat, percent).apply(value, StatBounds::COMBAT_STATS)
        };

        CombatStats {
            attack: stat(base.attack, self.flat.attack, self.attack_percent),
            magic_attack: stat(
                base.magic_attack,
                self.flat.magic_attack,
                self.magic_attack_percent,
            ),
            ranged_attack: stat(
                base.ranged_attack,
                self.flat.ranged_attack,
                if base.ranged_attack + self.flat.ranged_attack > 0 {
                    self.attack_percent
                } else {
                    0
                },
            ),
            defense: stat(base.defense, self.flat.defense, self.defense_percent),
            magic_defense: stat(
                base.magic_defense,
                self.flat.magic_defense,
                self.defense_percent,
            ),
            hit: stat(base.hit, self.flat.hit, 0),
            flee: stat(base.flee, self.flat.flee, 0),
            crit: base.crit,
            action_speed: stat(base.action_speed, self.flat.action_speed, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down() {
        // (10 + 5) * 1.5 = 22.5
        assert_eq!(Adjustment::new(5, 50).apply(10, StatBounds::COMBAT_STATS), 22);
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        assert_eq!(Adjustment::new(-50, 0).apply(10, StatBounds::COMBAT_STATS), 0);
        assert_eq!(Adjustment::new(0, -150).apply(10, StatBounds::COMBAT_STATS), 0);
    }

    #[test]
    fn percent_bonus_scales_recalculated_attack() {
        let totals = ModifierTotals {
            flat: StatDeltas {
                attack: 20,
                ..StatDeltas::default()
            },
            attack_percent: 50,
            ..ModifierTotals::default()
        };
        let base = CombatStats {
            attack: 80,
            ..CombatStats::default()
        };

        // (80 + 20) × 1.5, not 80 × 1.5 + 20
        assert_eq!(totals.apply_to(base).attack, 150);
    }
}
