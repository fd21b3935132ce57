//! Read-only collaborators of the rules engine.
//!
//! Oracles expose the skill catalog, the element affinity table, unit
//! templates and randomness. [`GameEnv`] bundles them; every slot is
//! optional and a missing oracle degrades to an empty capability rather than
//! an error.
mod rng;

use crate::skill::{Element, SkillDescriptor, SkillId};
use crate::state::UnitTemplate;

pub use rng::{LuckyRng, NeutralRng, PcgRng, RngOracle, SeedStream, compute_seed};

/// Skill catalog lookup.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: &SkillId) -> Option<&SkillDescriptor>;
}

/// Element affinity table. `1.0` is neutral.
pub trait ElementOracle: Send + Sync {
    fn multiplier(&self, attacker: Element, defender: Element) -> f64;
}

/// Unit template lookup by entity reference.
pub trait UnitCatalog: Send + Sync {
    fn template(&self, name: &str) -> Option<&UnitTemplate>;
}

static DEFAULT_RNG: PcgRng = PcgRng;

/// Aggregates the oracles an engine call may consult.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    skills: Option<&'a dyn SkillOracle>,
    elements: Option<&'a dyn ElementOracle>,
    units: Option<&'a dyn UnitCatalog>,
    rng: Option<&'a dyn RngOracle>,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        skills: Option<&'a dyn SkillOracle>,
        elements: Option<&'a dyn ElementOracle>,
        units: Option<&'a dyn UnitCatalog>,
        rng: Option<&'a dyn RngOracle>,
    ) -> Self {
        Self {
            skills,
            elements,
            units,
            rng,
        }
    }

    pub fn empty() -> Self {
        Self::new(None, None, None, None)
    }

    pub fn with_skills(mut self, skills: &'a dyn SkillOracle) -> Self {
        self.skills = Some(skills);
        self
    }

    pub fn with_elements(mut self, elements: &'a dyn ElementOracle) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn with_units(mut self, units: &'a dyn UnitCatalog) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Unknown ids and a missing catalog both yield `None`.
    pub fn skill(&self, id: &SkillId) -> Option<&'a SkillDescriptor> {
        self.skills.and_then(|oracle| oracle.skill(id))
    }

    /// Neutral when no table is installed.
    pub fn element_multiplier(&self, attacker: Element, defender: Element) -> f64 {
        self.elements
            .map_or(1.0, |table| table.multiplier(attacker, defender))
    }

    pub fn template(&self, name: &str) -> Option<&'a UnitTemplate> {
        self.units.and_then(|catalog| catalog.template(name))
    }

    /// Installed oracle, else [`PcgRng`].
    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng.unwrap_or(&DEFAULT_RNG)
    }
}

impl std::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEnv")
            .field("skills", &self.skills.is_some())
            .field("elements", &self.elements.is_some())
            .field("units", &self.units.is_some())
            .field("rng", &self.rng.is_some())
            .finish()
    }
}
