//! Skill descriptors and their one-time canonicalization.
//!
//! Catalog data arrives as [`RawSkill`] records with many optional fields.
//! [`SkillDescriptor::canonicalize`] resolves kind, range and shape once at
//! load time so no call site re-derives them.
mod targeting;

use std::fmt;

use crate::modifier::{ModifierSpec, StatusSpec};

pub use targeting::{SkillTargets, area_of_effect, reachable_skill_cells, skill_targets};

/// Catalog key of a skill.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillId(pub String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SkillKind {
    Damage,
    Magic,
    Ranged,
    Heal,
    Buff,
    Debuff,
    Summon,
    Revive,
}

impl SkillKind {
    /// Kinds that deal damage to the opposing side.
    pub const fn deals_damage(self) -> bool {
        matches!(self, Self::Damage | Self::Magic | Self::Ranged)
    }

    /// Kinds aimed at the opposing side.
    pub const fn is_offensive(self) -> bool {
        self.deals_damage() || matches!(self, Self::Debuff)
    }

    pub const fn is_magic(self) -> bool {
        matches!(self, Self::Magic)
    }

    pub const fn heals(self) -> bool {
        matches!(self, Self::Heal | Self::Revive)
    }
}

/// Geometry used both for legal target cells and the affected area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RangeShape {
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    SelfOnly,
    Ally,
    Heal,
    Single,
    Line,
    Cross,
    #[strum(to_string = "diamond", serialize = "default")]
    Diamond,
    #[strum(to_string = "circle", serialize = "aoe", serialize = "area")]
    Circle,
    /// Unrecognized tag; resolves to an empty area.
    Unknown,
}

impl RangeShape {
    /// Geometries that may include the caster's own cell.
    pub const fn is_supportive(self) -> bool {
        matches!(self, Self::SelfOnly | Self::Ally | Self::Heal)
    }
}

/// Distance metric for an area of effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AreaShape {
    /// Manhattan radius.
    #[default]
    Diamond,
    /// Chebyshev radius.
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaOfEffect {
    pub radius: u32,
    pub shape: AreaShape,
}

/// Elemental affinity of an attacker or defender.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Element {
    #[default]
    Neutral,
    Fire,
    Water,
    Earth,
    Wind,
    Holy,
    Shadow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HealSpec {
    /// Share of the target's max HP.
    pub percent: f64,
    /// Share of the caster's magic attack.
    pub magic_scaling: f64,
}

impl Default for HealSpec {
    fn default() -> Self {
        Self {
            percent: 0.0,
            magic_scaling: 0.0,
        }
    }
}

/// Skill record as authored in catalog data.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawSkill {
    pub id: String,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub range: Option<u32>,
    pub shape: Option<String>,
    pub aoe_radius: Option<u32>,
    pub aoe_shape: Option<String>,
    pub damage_multiplier: Option<f64>,
    pub hits: Option<u32>,
    pub element: Option<Element>,
    pub heal: Option<HealSpec>,
    pub buff: Option<ModifierSpec>,
    pub debuff: Option<ModifierSpec>,
    pub statuses: Vec<StatusSpec>,
    pub cost: u32,
    /// Unit template spawned by summon skills.
    pub summon: Option<String>,
}

impl RawSkill {
    /// Lowercased id, name, kind and shape tags used by the heuristics.
    fn keywords(&self) -> String {
        [
            Some(self.id.as_str()),
            self.name.as_deref(),
            self.kind.as_deref(),
            self.shape.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
    }
}

const ZERO_RANGE_KEYWORDS: [&str; 6] = ["self", "ally", "heal", "aoe", "revive", "summon"];
const MAGIC_KEYWORDS: [&str; 6] = ["magic", "bolt", "fire", "ice", "thunder", "spell"];
const RANGED_KEYWORDS: [&str; 4] = ["ranged", "arrow", "shot", "bow"];

/// Magic-coded skills without an explicit range.
pub const MAGIC_RANGE: u32 = 6;
/// Ranged-physical skills without an explicit range.
pub const RANGED_RANGE: u32 = 5;
/// Melee fallback.
pub const MELEE_RANGE: u32 = 1;

/// Resolves a raw skill's range: the explicit value, else a keyword guess.
pub fn skill_range(raw: &RawSkill) -> u32 {
    if let Some(range) = raw.range {
        return range;
    }
    let words = raw.keywords();
    let has = |list: &[&str]| list.iter().any(|k| words.contains(k));
    if has(&ZERO_RANGE_KEYWORDS) {
        0
    } else if has(&MAGIC_KEYWORDS) {
        MAGIC_RANGE
    } else if has(&RANGED_KEYWORDS) {
        RANGED_RANGE
    } else {
        MELEE_RANGE
    }
}

fn infer_kind(raw: &RawSkill) -> SkillKind {
    if let Some(kind) = raw.kind.as_deref().and_then(|k| k.parse().ok()) {
        return kind;
    }
    let words = raw.keywords();
    let has = |list: &[&str]| list.iter().any(|k| words.contains(k));
    if raw.summon.is_some() || words.contains("summon") {
        SkillKind::Summon
    } else if words.contains("revive") {
        SkillKind::Revive
    } else if raw.heal.is_some() || words.contains("heal") {
        SkillKind::Heal
    } else if has(&MAGIC_KEYWORDS) {
        SkillKind::Magic
    } else if has(&RANGED_KEYWORDS) {
        SkillKind::Ranged
    } else if raw.buff.is_some() && raw.damage_multiplier.is_none() {
        SkillKind::Buff
    } else if (raw.debuff.is_some() || !raw.statuses.is_empty()) && raw.damage_multiplier.is_none()
    {
        SkillKind::Debuff
    } else {
        SkillKind::Damage
    }
}

fn infer_shape(raw: &RawSkill, kind: SkillKind, area: Option<AreaOfEffect>) -> RangeShape {
    if let Some(tag) = raw.shape.as_deref() {
        return tag.parse().unwrap_or(RangeShape::Unknown);
    }
    match kind {
        SkillKind::Heal | SkillKind::Revive => RangeShape::Heal,
        SkillKind::Buff if raw.keywords().contains("self") => RangeShape::SelfOnly,
        SkillKind::Buff => RangeShape::Ally,
        SkillKind::Summon => RangeShape::Single,
        _ if area.is_some() => RangeShape::Circle,
        _ => RangeShape::Diamond,
    }
}

/// Canonical, immutable skill definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDescriptor {
    pub id: SkillId,
    pub name: String,
    pub kind: SkillKind,
    /// Zero means self, all allies or all enemies depending on shape and kind.
    pub range: u32,
    pub shape: RangeShape,
    pub area: Option<AreaOfEffect>,
    pub damage_multiplier: f64,
    /// At least one.
    pub hits: u32,
    /// Overrides the caster's element for damage.
    pub element: Option<Element>,
    pub heal: Option<HealSpec>,
    pub buff: Option<ModifierSpec>,
    pub debuff: Option<ModifierSpec>,
    pub statuses: Vec<StatusSpec>,
    pub cost: u32,
    pub summon: Option<String>,
}

impl SkillDescriptor {
    pub fn canonicalize(raw: RawSkill) -> Self {
        let kind = infer_kind(&raw);
        let area = raw
            .aoe_radius
            .filter(|r| *r > 0)
            .map(|radius| AreaOfEffect {
                radius,
                shape: raw
                    .aoe_shape
                    .as_deref()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
            });
        let shape = infer_shape(&raw, kind, area);
        let range = match kind {
            // Global unless the catalog names a range.
            SkillKind::Revive => raw.range.unwrap_or(0),
            // Summons need a target cell; zero-range summons go adjacent.
            SkillKind::Summon => skill_range(&raw).max(1),
            _ => skill_range(&raw),
        };
        let heal = match (kind.heals(), raw.heal) {
            (true, None) => Some(HealSpec::default()),
            (_, heal) => heal,
        };

        Self {
            name: raw.name.unwrap_or_else(|| raw.id.clone()),
            id: SkillId(raw.id),
            kind,
            range,
            shape,
            area,
            damage_multiplier: raw.damage_multiplier.unwrap_or(1.0),
            hits: raw.hits.unwrap_or(1).max(1),
            element: raw.element,
            heal,
            buff: raw.buff,
            debuff: raw.debuff,
            statuses: raw.statuses,
            cost: raw.cost,
            summon: raw.summon,
        }
    }

    /// Range 0 on anything but a self skill means "every valid unit".
    pub fn is_global(&self) -> bool {
        self.range == 0 && self.shape != RangeShape::SelfOnly
    }

    /// True when the skill is aimed at the caster's side.
    pub fn targets_allies(&self) -> bool {
        !self.kind.is_offensive()
    }
}
