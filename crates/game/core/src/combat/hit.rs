//! Per-hit random rolls.

use crate::config::GameConfig;
use crate::env::RngOracle;

/// Crit chance clamped to the configured window, in percent.
pub fn crit_chance(stat: i32, bonus: i32) -> i32 {
    (stat + bonus).clamp(GameConfig::CRIT_CHANCE_MIN, GameConfig::CRIT_CHANCE_MAX)
}

pub fn roll_critical(rng: &dyn RngOracle, seed: u64, chance: i32) -> bool {
    rng.roll_d100(seed) as i32 <= chance
}

/// Parry only triggers for targets with a buff-granted chance.
pub fn roll_parry(rng: &dyn RngOracle, seed: u64, chance: f64) -> bool {
    chance > 0.0 && rng.chance(seed, chance)
}
