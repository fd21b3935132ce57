//! Element affinity table loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::Element;

use crate::catalog::ElementTable;
use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ElementFile {
    /// (attacker, defender, multiplier)
    affinities: Vec<(Element, Element, f64)>,
}

pub struct ElementLoader;

impl ElementLoader {
    pub fn load(path: &Path) -> LoadResult<ElementTable> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load elements from {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<ElementTable> {
        let file: ElementFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse element table RON: {}", e))?;

        let mut table = ElementTable::new();
        for (attacker, defender, multiplier) in file.affinities {
            if !multiplier.is_finite() || multiplier < 0.0 {
                anyhow::bail!("invalid multiplier {multiplier} for {attacker} -> {defender}");
            }
            table.set(attacker, defender, multiplier);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::ElementOracle;

    use super::*;

    #[test]
    fn affinities_are_directional() {
        let table = ElementLoader::parse("(affinities: [(water, fire, 1.5), (fire, water, 0.5)])")
            .unwrap();
        assert_eq!(table.multiplier(Element::Water, Element::Fire), 1.5);
        assert_eq!(table.multiplier(Element::Fire, Element::Water), 0.5);
        assert_eq!(table.multiplier(Element::Holy, Element::Shadow), 1.0);
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        assert!(ElementLoader::parse("(affinities: [(holy, shadow, -1.0)])").is_err());
    }
}
