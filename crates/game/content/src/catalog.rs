//! In-memory catalogs implementing the core oracle traits.

use std::collections::{BTreeMap, HashMap};

use tactics_core::{
    Element, ElementOracle, RawSkill, SkillDescriptor, SkillId, SkillOracle, UnitCatalog,
    UnitTemplate,
};

/// Canonical skills keyed by id.
#[derive(Clone, Debug, Default)]
pub struct SkillCatalog {
    skills: BTreeMap<SkillId, SkillDescriptor>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalizes every raw record. Later duplicates replace earlier ones.
    pub fn from_raw(raw: impl IntoIterator<Item = RawSkill>) -> Self {
        let mut catalog = Self::new();
        for skill in raw {
            catalog.insert(SkillDescriptor::canonicalize(skill));
        }
        catalog
    }

    /// Adds a skill, returning the one it replaced.
    pub fn insert(&mut self, skill: SkillDescriptor) -> Option<SkillDescriptor> {
        self.skills.insert(skill.id.clone(), skill)
    }

    pub fn get(&self, id: &SkillId) -> Option<&SkillDescriptor> {
        self.skills.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDescriptor> {
        self.skills.values()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl SkillOracle for SkillCatalog {
    fn skill(&self, id: &SkillId) -> Option<&SkillDescriptor> {
        self.get(id)
    }
}

/// Attacker/defender element multipliers. Unlisted pairs are neutral.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementTable {
    affinities: HashMap<(Element, Element), f64>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, attacker: Element, defender: Element, multiplier: f64) {
        self.affinities.insert((attacker, defender), multiplier);
    }

    pub fn len(&self) -> usize {
        self.affinities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.affinities.is_empty()
    }
}

impl ElementOracle for ElementTable {
    fn multiplier(&self, attacker: Element, defender: Element) -> f64 {
        self.affinities
            .get(&(attacker, defender))
            .copied()
            .unwrap_or(1.0)
    }
}

/// Unit templates keyed by entity reference.
#[derive(Clone, Debug, Default)]
pub struct TemplateCatalog {
    templates: HashMap<String, UnitTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: UnitTemplate) -> Option<UnitTemplate> {
        self.templates.insert(template.name.clone(), template)
    }

    pub fn get(&self, name: &str) -> Option<&UnitTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl UnitCatalog for TemplateCatalog {
    fn template(&self, name: &str) -> Option<&UnitTemplate> {
        self.get(name)
    }
}
