//! Shared, immutable content behind the engine's oracle traits.
//!
//! [`OracleManager`] bundles the catalogs so the worker can build a
//! [`GameEnv`] on demand. Content never changes at runtime; dynamic state
//! lives in [`tactics_core::EncounterState`] and the repositories.

use std::sync::Arc;

use tactics_content::{ContentBundle, ElementTable, SkillCatalog, TemplateCatalog};
use tactics_core::{GameEnv, PcgRng};

/// Manages all oracle implementations and provides unified access
#[derive(Clone, Default)]
pub struct OracleManager {
    pub(crate) skills: Arc<SkillCatalog>,
    pub(crate) elements: Arc<ElementTable>,
    pub(crate) units: Arc<TemplateCatalog>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(
        skills: Arc<SkillCatalog>,
        elements: Arc<ElementTable>,
        units: Arc<TemplateCatalog>,
    ) -> Self {
        Self {
            skills,
            elements,
            units,
            rng: PcgRng,
        }
    }

    pub fn from_bundle(bundle: ContentBundle) -> Self {
        Self::new(
            Arc::new(bundle.skills),
            Arc::new(bundle.elements),
            Arc::new(bundle.units),
        )
    }

    /// Converts oracle manager into GameEnv for tactics-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        GameEnv::empty()
            .with_skills(self.skills.as_ref())
            .with_elements(self.elements.as_ref())
            .with_units(self.units.as_ref())
            .with_rng(&self.rng)
    }

    pub fn skills(&self) -> &SkillCatalog {
        &self.skills
    }

    pub fn units(&self) -> &TemplateCatalog {
        &self.units
    }
}
