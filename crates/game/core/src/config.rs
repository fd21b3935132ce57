/// Game configuration constants and tunable parameters.
///
/// Combat math constants are fixed (not tunable at runtime); only the
/// defaults used when a template omits a value can be changed per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Move range assigned to units whose template does not specify one.
    pub default_move_range: u32,
    /// Attack range assigned to units whose template does not specify one.
    pub default_attack_range: u32,
}

impl GameConfig {
    // ===== roster capacities =====
    pub const MAX_PARTY: usize = 16;
    pub const MAX_ENEMIES: usize = 32;

    // ===== damage variance (percent) =====
    pub const ATTACK_VARIANCE: (u32, u32) = (80, 120);
    pub const SKILL_VARIANCE: (u32, u32) = (90, 110);

    // ===== critical hits =====
    pub const CRIT_MULTIPLIER: f64 = 1.5;
    pub const CRIT_CHANCE_MIN: i32 = 1;
    pub const CRIT_CHANCE_MAX: i32 = 95;

    // ===== mitigation =====
    /// Share of defense subtracted from a basic attack.
    pub const ATTACK_DEFENSE_RATIO: f64 = 0.5;
    /// Share of defense subtracted from a physical skill hit.
    pub const SKILL_DEFENSE_RATIO: f64 = 0.3;
    /// Share of magic defense subtracted from a magic skill hit.
    pub const SKILL_MAGIC_DEFENSE_RATIO: f64 = 0.25;
    pub const MIN_DAMAGE: u32 = 1;

    // ===== healing =====
    pub const MIN_HEAL: u32 = 1;

    // ===== status effects =====
    pub const PARALYZE_SKIP_CHANCE: f64 = 0.5;
    pub const POISON_TICK: f64 = 0.05;
    pub const BURN_TICK: f64 = 0.08;
    pub const BLEED_TICK: f64 = 0.06;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MOVE_RANGE: u32 = 3;
    pub const DEFAULT_ATTACK_RANGE: u32 = 1;

    pub fn new() -> Self {
        Self {
            default_move_range: Self::DEFAULT_MOVE_RANGE,
            default_attack_range: Self::DEFAULT_ATTACK_RANGE,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
