//! Skill catalog loader.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{RawSkill, SkillDescriptor};

use crate::catalog::SkillCatalog;
use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillFile {
    pub skills: Vec<RawSkill>,
}

/// Loads `skills.ron` and canonicalizes every record once.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<SkillCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load skills from {}: {}", path.display(), e))
    }

    /// Parses a catalog document. Duplicate ids are rejected.
    pub fn parse(content: &str) -> LoadResult<SkillCatalog> {
        let file: SkillFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        let mut catalog = SkillCatalog::new();
        for raw in file.skills {
            if raw.id.is_empty() {
                anyhow::bail!("skill without an id");
            }
            if !seen.insert(raw.id.clone()) {
                anyhow::bail!("duplicate skill id '{}'", raw.id);
            }
            catalog.insert(SkillDescriptor::canonicalize(raw));
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{RangeShape, SkillKind, SkillOracle, StatusKind};

    use super::*;

    const CATALOG: &str = r#"#![enable(implicit_some)]
        (
            skills: [
                (id: "ice_lance", damage_multiplier: 1.4, cost: 8),
                (id: "mend", kind: "heal", heal: (percent: 0.2), cost: 6),
                (
                    id: "shield_bash",
                    statuses: [(kind: stun, duration: 1, chance: 0.5)],
                    damage_multiplier: 0.8,
                ),
            ],
        )
    "#;

    #[test]
    fn parses_and_canonicalizes() {
        let catalog = SkillLoader::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);

        let lance = catalog.skill(&"ice_lance".into()).unwrap();
        assert_eq!(lance.kind, SkillKind::Magic);
        assert_eq!(lance.range, tactics_core::skill::MAGIC_RANGE);
        assert_eq!(lance.shape, RangeShape::Diamond);

        let mend = catalog.skill(&"mend".into()).unwrap();
        assert_eq!(mend.kind, SkillKind::Heal);
        assert_eq!(mend.range, 0);

        let bash = catalog.skill(&"shield_bash".into()).unwrap();
        assert_eq!(bash.kind, SkillKind::Damage);
        assert_eq!(bash.statuses[0].kind, StatusKind::Stun);
        assert_eq!(bash.statuses[0].chance, 0.5);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = SkillLoader::parse(r#"(skills: [(id: "a"), (id: "a")])"#).unwrap_err();
        assert!(err.to_string().contains("duplicate skill id 'a'"));
    }
}
