//! Content factory for building catalogs from a data directory.

use std::path::{Path, PathBuf};

use tactics_core::{GameConfig, GameEnv};

use crate::catalog::{ElementTable, SkillCatalog, TemplateCatalog};
use crate::loaders::{
    ConfigLoader, ElementLoader, EncounterLayout, EncounterLoader, LoadResult, SkillLoader,
    UnitLoader,
};

/// Every catalog an encounter needs, loaded together.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    pub config: GameConfig,
    pub skills: SkillCatalog,
    pub elements: ElementTable,
    pub units: TemplateCatalog,
}

impl ContentBundle {
    /// Oracles borrowed from this bundle, with the default RNG.
    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::empty()
            .with_skills(&self.skills)
            .with_elements(&self.elements)
            .with_units(&self.units)
    }

    /// Skill references in unit templates that the skill catalog lacks.
    pub fn dangling_skills(&self) -> Vec<(String, String)> {
        let mut missing: Vec<_> = self
            .units
            .names()
            .filter_map(|name| self.units.get(name))
            .flat_map(|template| {
                template
                    .skills
                    .iter()
                    .filter(|id| self.skills.get(id).is_none())
                    .map(|id| (template.name.clone(), id.to_string()))
            })
            .collect();
        missing.sort();
        missing
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml        (optional)
/// ├── skills.ron
/// ├── elements.ron
/// ├── units.ron
/// └── encounters/
///     ├── training_field.ron
///     └── ...
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `config.toml`, or the defaults when the file is absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_skills(&self) -> LoadResult<SkillCatalog> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    pub fn load_elements(&self) -> LoadResult<ElementTable> {
        ElementLoader::load(&self.data_dir.join("elements.ron"))
    }

    pub fn load_units(&self, config: &GameConfig) -> LoadResult<TemplateCatalog> {
        UnitLoader::load(&self.data_dir.join("units.ron"), config)
    }

    /// Loads `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterLayout> {
        let path = self
            .data_dir
            .join("encounters")
            .join(format!("{}.ron", name));
        EncounterLoader::load(&path)
    }

    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let config = self.load_config()?;
        Ok(ContentBundle {
            skills: self.load_skills()?,
            elements: self.load_elements()?,
            units: self.load_units(&config)?,
            config,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
