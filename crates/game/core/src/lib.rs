//! Deterministic rules for turn-based tactical combat.
//!
//! `tactics-core` defines the canonical rules (grid, targeting, stats,
//! modifiers, combat, turn engine) and exposes pure APIs that can be reused
//! by the runtime and by offline tools. All state mutation flows through
//! [`engine::TurnEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod grid;
pub mod modifier;
pub mod skill;
pub mod snapshot;
pub mod state;
pub mod stats;

pub use combat::{HitResult, calculate_damage, calculate_heal};
pub use config::GameConfig;
pub use engine::{ActionError, Effect, PlannedAction, PlayerCommand, TurnEngine};
pub use env::{
    ElementOracle, GameEnv, LuckyRng, NeutralRng, PcgRng, RngOracle, SeedStream, SkillOracle,
    UnitCatalog,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use event::GameEvent;
pub use grid::{Grid, Occupancy, find_path, reachable_cells};
pub use modifier::{
    ModifierId, ModifierKind, ModifierPayload, ModifierSet, ModifierSpec, StatPayload, StatusKind,
    StatusSpec, TimedModifier,
};
pub use skill::{
    AreaShape, Element, RangeShape, RawSkill, SkillDescriptor, SkillId, SkillKind,
    area_of_effect, reachable_skill_cells, skill_targets,
};
pub use snapshot::{RestoreError, SessionSnapshot, UnitRecord};
pub use state::{
    Allegiance, EncounterOutcome, EncounterState, Facing, InvariantError, Phase, Position,
    Rosters, StateError, TurnIndex, TurnState, Unit, UnitId, UnitTemplate,
};
pub use stats::{Attributes, CombatStats, recalculate_stats};
