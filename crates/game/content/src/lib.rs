//! Data-driven content definitions and loaders.
//!
//! This crate houses the static catalogs an encounter consults and provides
//! loaders for RON/TOML data files:
//! - Skill catalog (data-driven via RON, canonicalized once at load time)
//! - Element affinity table (data-driven via RON)
//! - Unit templates (data-driven via RON)
//! - Encounter layouts (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! Catalogs implement the core oracle traits and never appear in encounter
//! state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{ElementTable, SkillCatalog, TemplateCatalog};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, ElementLoader, EncounterLayout, EncounterLoader,
    Placement, RawUnitTemplate, SkillLoader, UnitLoader,
};
