//! Resource maximums - Layer 3 of the stat system.
//!
//! Maximum HP/MP are computed from level and attributes and never stored;
//! current values are state and are clamped whenever the maximum moves.
//!
//! Formulas:
//! - HP_max = 100 × Level + 25 × VIT
//! - MP_max = 15 × Level + 8 × INT

use super::bonus::StatBounds;
use super::core::Attributes;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceMaximums {
    pub hp_max: u32,
    pub mp_max: u32,
}

impl ResourceMaximums {
    pub fn compute(attributes: &Attributes, level: u32) -> Self {
        Self {
            hp_max: Self::compute_hp(attributes, level),
            mp_max: Self::compute_mp(attributes, level),
        }
    }

    /// HP: 100 × Level + 25 × VIT, at least 1.
    pub fn compute_hp(attributes: &Attributes, level: u32) -> u32 {
        let hp = 100 * level as i64 + 25 * attributes.vit as i64;
        hp.clamp(
            StatBounds::RESOURCE_MAXIMUMS.min as i64,
            StatBounds::RESOURCE_MAXIMUMS.max as i64,
        ) as u32
    }

    /// MP: 15 × Level + 8 × INT, may be 0.
    pub fn compute_mp(attributes: &Attributes, level: u32) -> u32 {
        let mp = 15 * level as i64 + 8 * attributes.int as i64;
        mp.clamp(0, StatBounds::RESOURCE_MAXIMUMS.max as i64) as u32
    }
}
