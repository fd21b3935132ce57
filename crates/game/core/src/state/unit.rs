use super::{Allegiance, Facing, Position, UnitId};
use crate::modifier::{ModifierKind, ModifierSet};
use crate::skill::{Element, SkillId};
use crate::stats::{Attributes, CombatStats, ModifierTotals, recalculate_stats};

/// Catalog description of a unit type, with defaults already resolved.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    /// Entity reference persisted in session snapshots.
    pub name: String,
    pub level: u32,
    pub attributes: Attributes,
    pub element: Element,
    pub move_range: u32,
    pub attack_range: u32,
    /// Flat ranged attack; zero falls back to melee attack.
    pub ranged_attack: i32,
    pub skills: Vec<SkillId>,
}

/// A combatant on the grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub template: String,
    pub allegiance: Allegiance,
    pub position: Position,
    pub facing: Facing,
    pub level: u32,
    pub element: Element,

    /// Attributes as authored; never modified by buffs.
    pub base_attributes: Attributes,
    /// Base attributes plus active modifier deltas.
    pub attributes: Attributes,
    pub base_ranged_attack: i32,
    pub stats: CombatStats,
    pub totals: ModifierTotals,

    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,

    pub move_range: u32,
    pub attack_range: u32,
    pub skills: Vec<SkillId>,

    pub has_acted: bool,
    pub has_moved: bool,

    pub buffs: ModifierSet,
    pub debuffs: ModifierSet,
    pub statuses: ModifierSet,
}

impl Unit {
    /// Fresh unit at full health with derived stats computed.
    pub fn from_template(
        id: UnitId,
        template: &UnitTemplate,
        allegiance: Allegiance,
        position: Position,
    ) -> Self {
        let mut unit = Self {
            id,
            template: template.name.clone(),
            allegiance,
            position,
            facing: Facing::default(),
            level: template.level.max(1),
            element: template.element,
            base_attributes: template.attributes,
            attributes: template.attributes,
            base_ranged_attack: template.ranged_attack,
            stats: CombatStats::default(),
            totals: ModifierTotals::default(),
            hp: 0,
            max_hp: 0,
            mp: 0,
            max_mp: 0,
            move_range: template.move_range,
            attack_range: template.attack_range,
            skills: template.skills.clone(),
            has_acted: false,
            has_moved: false,
            buffs: ModifierSet::new(),
            debuffs: ModifierSet::new(),
            statuses: ModifierSet::new(),
        };
        recalculate_stats(&mut unit, true);
        unit
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_party(&self) -> bool {
        self.allegiance.is_party()
    }

    /// Move range after modifier bonuses.
    pub fn effective_move_range(&self) -> u32 {
        self.move_range.saturating_add_signed(self.totals.move_bonus)
    }

    pub fn knows(&self, skill: &SkillId) -> bool {
        self.skills.contains(skill)
    }

    pub fn modifiers(&self, kind: ModifierKind) -> &ModifierSet {
        match kind {
            ModifierKind::Buff => &self.buffs,
            ModifierKind::Debuff => &self.debuffs,
            ModifierKind::Status => &self.statuses,
        }
    }

    pub fn modifiers_mut(&mut self, kind: ModifierKind) -> &mut ModifierSet {
        match kind {
            ModifierKind::Buff => &mut self.buffs,
            ModifierKind::Debuff => &mut self.debuffs,
            ModifierKind::Status => &mut self.statuses,
        }
    }

    /// HP as a share of max HP.
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            f64::from(self.hp) / f64::from(self.max_hp)
        }
    }

    /// Resets the per-phase action flags.
    pub(crate) fn ready(&mut self) {
        self.has_acted = false;
        self.has_moved = false;
    }

    /// Applies damage and returns the remaining HP.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    /// Restores HP up to the maximum and returns the amount actually healed.
    pub(crate) fn restore_hp(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }
}
