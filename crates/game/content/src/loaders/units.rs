//! Unit template loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{Attributes, Element, GameConfig, SkillId, UnitTemplate};

use crate::catalog::TemplateCatalog;
use crate::loaders::{LoadResult, read_file};

/// Template as authored. Missing ranges take the configured defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUnitTemplate {
    pub name: String,
    #[serde(default = "first_level")]
    pub level: u32,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub move_range: Option<u32>,
    #[serde(default)]
    pub attack_range: Option<u32>,
    #[serde(default)]
    pub ranged_attack: i32,
    #[serde(default)]
    pub skills: Vec<String>,
}

fn first_level() -> u32 {
    1
}

impl RawUnitTemplate {
    pub fn resolve(self, config: &GameConfig) -> UnitTemplate {
        UnitTemplate {
            name: self.name,
            level: self.level.max(1),
            attributes: self.attributes,
            element: self.element,
            move_range: self.move_range.unwrap_or(config.default_move_range),
            attack_range: self.attack_range.unwrap_or(config.default_attack_range),
            ranged_attack: self.ranged_attack,
            skills: self.skills.into_iter().map(SkillId).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnitFile {
    units: Vec<RawUnitTemplate>,
}

/// Loads `units.ron` into a [`TemplateCatalog`].
pub struct UnitLoader;

impl UnitLoader {
    pub fn load(path: &Path, config: &GameConfig) -> LoadResult<TemplateCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, config)
            .map_err(|e| anyhow::anyhow!("Failed to load units from {}: {}", path.display(), e))
    }

    pub fn parse(content: &str, config: &GameConfig) -> LoadResult<TemplateCatalog> {
        let file: UnitFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit templates RON: {}", e))?;

        let mut catalog = TemplateCatalog::new();
        for raw in file.units {
            let name = raw.name.clone();
            if catalog.insert(raw.resolve(config)).is_some() {
                anyhow::bail!("duplicate unit template '{name}'");
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::UnitCatalog;

    use super::*;

    const UNITS: &str = r#"#![enable(implicit_some)]
        (
            units: [
                (
                    name: "archer",
                    level: 4,
                    attributes: (str: 6, agi: 12, dex: 14),
                    attack_range: 4,
                    ranged_attack: 9,
                    skills: ["piercing_shot"],
                ),
                (name: "slime", element: water),
            ],
        )
    "#;

    #[test]
    fn omitted_fields_use_defaults() {
        let config = GameConfig {
            default_move_range: 4,
            ..GameConfig::default()
        };
        let catalog = UnitLoader::parse(UNITS, &config).unwrap();

        let archer = catalog.template("archer").unwrap();
        assert_eq!(archer.attack_range, 4);
        assert_eq!(archer.move_range, 4);
        assert_eq!(archer.attributes.dex, 14);
        assert_eq!(archer.attributes.vit, 0);
        assert_eq!(archer.skills, vec![SkillId::new("piercing_shot")]);

        let slime = catalog.template("slime").unwrap();
        assert_eq!(slime.level, 1);
        assert_eq!(slime.element, Element::Water);
        assert_eq!(slime.attack_range, GameConfig::DEFAULT_ATTACK_RANGE);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let doc = r#"(units: [(name: "imp"), (name: "imp")])"#;
        assert!(UnitLoader::parse(doc, &GameConfig::default()).is_err());
    }
}
