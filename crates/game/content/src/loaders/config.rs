//! Tunable rule defaults from `config.toml`.

use std::path::Path;

use anyhow::Context;
use tactics_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Reads [`GameConfig`] overrides. Keys left out keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_move_range = 5").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.default_move_range, 5);
        assert_eq!(config.default_attack_range, GameConfig::DEFAULT_ATTACK_RANGE);
    }

    #[test]
    fn empty_document_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), GameConfig::default());
    }
}
