//! Base attributes - Layer 1 of the stat system.
//!
//! The six attributes plus level are the only stats that are persisted. All
//! other stats are derived from them.

use super::bonus::StatBounds;

/// The six base attributes that define a unit.
///
/// - **STR**: melee attack
/// - **AGI**: flee, action speed, soft defense
/// - **VIT**: health, soft defense
/// - **INT**: magic attack, mana
/// - **DEX**: hit, ranged and magic scaling
/// - **LUK**: critical chance, small bonus everywhere
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub str: i32,
    pub agi: i32,
    pub vit: i32,
    pub int: i32,
    pub dex: i32,
    pub luk: i32,
}

impl Attributes {
    pub const ZERO: Self = Self::new(0, 0, 0, 0, 0, 0);

    pub const fn new(str: i32, agi: i32, vit: i32, int: i32, dex: i32, luk: i32) -> Self {
        Self {
            str,
            agi,
            vit,
            int,
            dex,
            luk,
        }
    }

    /// Component-wise sum (used to layer attribute deltas on the base snapshot).
    pub const fn plus(&self, other: &Self) -> Self {
        Self {
            str: self.str + other.str,
            agi: self.agi + other.agi,
            vit: self.vit + other.vit,
            int: self.int + other.int,
            dex: self.dex + other.dex,
            luk: self.luk + other.luk,
        }
    }

    pub fn clamped(&self, bounds: StatBounds) -> Self {
        Self {
            str: self.str.clamp(bounds.min, bounds.max),
            agi: self.agi.clamp(bounds.min, bounds.max),
            vit: self.vit.clamp(bounds.min, bounds.max),
            int: self.int.clamp(bounds.min, bounds.max),
            dex: self.dex.clamp(bounds.min, bounds.max),
            luk: self.luk.clamp(bounds.min, bounds.max),
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.str == 0
            && self.agi == 0
            && self.vit == 0
            && self.int == 0
            && self.dex == 0
            && self.luk == 0
    }
}
