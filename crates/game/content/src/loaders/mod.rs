//! Content loaders for reading game data from files.
//!
//! Skills, element affinities, unit templates and encounter layouts are RON
//! documents; the tunable game configuration is TOML. Every loader returns
//! plain data or a catalog ready to be wired into a `GameEnv`.

pub mod config;
pub mod elements;
pub mod encounter;
pub mod factory;
pub mod skills;
pub mod units;

pub use config::ConfigLoader;
pub use elements::ElementLoader;
pub use encounter::{EncounterLayout, EncounterLoader, Placement};
pub use factory::{ContentBundle, ContentFactory};
pub use skills::SkillLoader;
pub use units::{RawUnitTemplate, UnitLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
