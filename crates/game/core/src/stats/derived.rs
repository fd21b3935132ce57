//! Combat stats - Layer 2 of the stat system.
//!
//! Combat stats are pure functions of level and effective attributes. They
//! are NOT stored in session snapshots; they are recomputed on restore.
//!
//! All formulas are evaluated in integer tenths so the result does not depend
//! on floating point rounding.

use super::core::Attributes;

/// Derived combat statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    /// Melee attack power.
    pub attack: i32,
    /// Magic attack power (also scales healing).
    pub magic_attack: i32,
    /// Ranged attack power. Zero means "use melee attack".
    pub ranged_attack: i32,
    /// Physical soft defense.
    pub defense: i32,
    /// Magic soft defense.
    pub magic_defense: i32,
    pub hit: i32,
    pub flee: i32,
    /// Critical chance in percent, before buff bonuses and clamping.
    pub crit: i32,
    pub action_speed: i32,
}

impl CombatStats {
    /// Compute base combat stats from effective attributes (internal helper).
    ///
    /// Base formulas (before bonuses):
    /// - Attack: 2×STR + 1.5×Lv + 0.5×DEX + 0.3×LUK + 50
    /// - Magic attack: 2×INT + 1.2×Lv + 0.4×DEX + 0.3×LUK + 30
    /// - Defense: 0.8×VIT + 0.3×AGI + 0.5×Lv
    /// - Magic defense: 0.8×INT + 0.3×VIT + 0.5×Lv
    /// - Hit: 175 + 2×Lv + 1.5×DEX + 0.5×LUK
    /// - Flee: 100 + 2×Lv + 1.5×AGI + 0.5×LUK
    /// - Crit: 1 + 0.4×LUK + 0.1×Lv
    /// - Action speed: 150 + 0.5×AGI + 0.3×DEX + 0.2×Lv
    pub(crate) fn compute_base(a: &Attributes, level: u32) -> Self {
        let lv = level as i32;
        Self {
            attack: tenths(20 * a.str + 15 * lv + 5 * a.dex + 3 * a.luk + 500),
            magic_attack: tenths(20 * a.int + 12 * lv + 4 * a.dex + 3 * a.luk + 300),
            ranged_attack: 0,
            defense: tenths(8 * a.vit + 3 * a.agi + 5 * lv),
            magic_defense: tenths(8 * a.int + 3 * a.vit + 5 * lv),
            hit: tenths(1750 + 20 * lv + 15 * a.dex + 5 * a.luk),
            flee: tenths(1000 + 20 * lv + 15 * a.agi + 5 * a.luk),
            crit: tenths(10 + 4 * a.luk + lv),
            action_speed: tenths(1500 + 5 * a.agi + 3 * a.dex + 2 * lv),
        }
    }
}

/// Floor of a value expressed in tenths.
const fn tenths(value: i32) -> i32 {
    value.div_euclid(10)
}

/// Flat combat-stat deltas carried by buff/debuff payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatDeltas {
    pub attack: i32,
    pub magic_attack: i32,
    pub ranged_attack: i32,
    pub defense: i32,
    pub magic_defense: i32,
    pub hit: i32,
    pub flee: i32,
    pub action_speed: i32,
}

impl StatDeltas {
    pub(crate) fn accumulate(&mut self, other: &Self) {
        self.attack += other.attack;
        self.magic_attack += other.magic_attack;
        self.ranged_attack += other.ranged_attack;
        self.defense += other.defense;
        self.magic_defense += other.magic_defense;
        self.hit += other.hit;
        self.flee += other.flee;
        self.action_speed += other.action_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_level_one_unit() {
        let stats = CombatStats::compute_base(&Attributes::new(10, 10, 10, 10, 10, 10), 1);

        // 20 + 1.5 + 5 + 3 + 50 = 79.5
        assert_eq!(stats.attack, 79);
        // 20 + 1.2 + 4 + 3 + 30 = 58.2
        assert_eq!(stats.magic_attack, 58);
        // 8 + 3 + 0.5 = 11.5
        assert_eq!(stats.defense, 11);
        assert_eq!(stats.magic_defense, 11);
        // 175 + 2 + 15 + 5
        assert_eq!(stats.hit, 197);
        // 100 + 2 + 15 + 5
        assert_eq!(stats.flee, 122);
        // 1 + 4 + 0.1 = 5.1
        assert_eq!(stats.crit, 5);
        // 150 + 5 + 3 + 0.2 = 158.2
        assert_eq!(stats.action_speed, 158);
        assert_eq!(stats.ranged_attack, 0);
    }

    #[test]
    fn formulas_scale_with_level() {
        let low = CombatStats::compute_base(&Attributes::ZERO, 1);
        let high = CombatStats::compute_base(&Attributes::ZERO, 11);

        // +1.5 attack per level
        assert_eq!(high.attack - low.attack, 15);
        // +2 hit per level
        assert_eq!(high.hit - low.hit, 20);
    }
}
