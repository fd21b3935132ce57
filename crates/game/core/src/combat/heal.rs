//! Heal calculation.

use crate::config::GameConfig;
use crate::skill::HealSpec;

/// `floor(max_hp × percent) + floor(magic_attack × magic_scaling)`, at
/// least one. Clamping to the target's maximum happens when applied.
pub fn calculate_heal(spec: &HealSpec, target_max_hp: u32, caster_magic_attack: i32) -> u32 {
    let from_target = (f64::from(target_max_hp) * spec.percent).floor().max(0.0);
    let from_caster = (f64::from(caster_magic_attack.max(0)) * spec.magic_scaling)
        .floor()
        .max(0.0);
    ((from_target + from_caster) as u32).max(GameConfig::MIN_HEAL)
}
