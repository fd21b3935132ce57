//! Stat system - layered recomputation from a persisted attribute snapshot.
//!
//! # Architecture
//!
//! ```text
//! [ Base Attributes (Layer 1, persisted) ] + attribute deltas
//!      ↓
//! [ Combat Stats (Layer 2) ] + flat deltas → %Inc
//!      ↓
//! [ Resource Maximums (Layer 3) ]
//! ```
//!
//! ## Principles
//!
//! 1. **SSOT**: only base attributes, level, and current HP/MP are stored
//! 2. **Never compound**: recomputation always starts from the base snapshot,
//!    never from a previously modified attribute set
//! 3. **Deterministic**: pure functions, no I/O or randomness
//!
//! ## Adjustment order
//!
//! Every combat stat is adjusted as flat, then percent, then clamp. Percentage
//! bonuses therefore scale the fully recalculated value, not the base.

pub mod bonus;
pub mod core;
pub mod derived;
pub mod resources;

pub use bonus::{Adjustment, ModifierTotals, StatBounds};
pub use core::Attributes;
pub use derived::{CombatStats, StatDeltas};
pub use resources::ResourceMaximums;

use crate::state::Unit;

/// Recomputes a unit's derived stats from its base attribute snapshot plus
/// every active buff and debuff.
///
/// Current HP/MP are clamped to the new maximums. They are only raised to
/// the maximum when `new_encounter` is set (fresh units at encounter start).
pub fn recalculate_stats(unit: &mut Unit, new_encounter: bool) {
    let totals = ModifierTotals::collect(unit.buffs.iter().chain(unit.debuffs.iter()));

    let attributes = unit
        .base_attributes
        .plus(&totals.attributes)
        .clamped(StatBounds::ATTRIBUTES);

    let mut stats = CombatStats::compute_base(&attributes, unit.level);
    stats.ranged_attack = unit.base_ranged_attack;
    stats = totals.apply_to(stats);

    let maximums = ResourceMaximums::compute(&attributes, unit.level);

    unit.attributes = attributes;
    unit.stats = stats;
    unit.max_hp = maximums.hp_max;
    unit.max_mp = maximums.mp_max;
    if new_encounter {
        unit.hp = maximums.hp_max;
        unit.mp = maximums.mp_max;
    } else {
        unit.hp = unit.hp.min(maximums.hp_max);
        unit.mp = unit.mp.min(maximums.mp_max);
    }
    unit.totals = totals;
}
