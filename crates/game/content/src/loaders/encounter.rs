//! Encounter layout loader.
//!
//! A layout is terrain plus the starting placements of both sides. Cells are
//! 1-indexed, matching the grid.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tactics_core::{Allegiance, EncounterState, Grid, Position, UnitCatalog};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Unit template name.
    pub template: String,
    pub allegiance: Allegiance,
    pub at: (i32, i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterLayout {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub walls: Vec<(i32, i32)>,
    #[serde(default)]
    pub seed: u64,
    pub units: Vec<Placement>,
}

impl EncounterLayout {
    pub fn grid(&self) -> Grid {
        Grid::new(
            self.width,
            self.height,
            self.walls.iter().map(|&(x, y)| Position::new(x, y)),
        )
    }

    /// Spawns every placement in order. The first player placement becomes
    /// the player character.
    pub fn build(&self, catalog: &dyn UnitCatalog) -> LoadResult<EncounterState> {
        let mut state = EncounterState::new(self.grid(), self.seed);
        for placement in &self.units {
            let template = catalog.template(&placement.template).with_context(|| {
                format!(
                    "encounter '{}' references unknown unit '{}'",
                    self.name, placement.template
                )
            })?;
            let (x, y) = placement.at;
            state
                .spawn(template, placement.allegiance, Position::new(x, y))
                .with_context(|| {
                    format!("cannot place '{}' at ({x}, {y})", placement.template)
                })?;
        }
        Ok(state)
    }
}

pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load encounter {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<EncounterLayout> {
        let layout: EncounterLayout = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;
        if layout.width == 0 || layout.height == 0 {
            anyhow::bail!("encounter '{}' has an empty grid", layout.name);
        }
        Ok(layout)
    }
}
