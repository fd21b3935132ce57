//! Combat resolution.
//!
//! Pure functions: every random input comes from a [`crate::env::SeedStream`]
//! and nothing here mutates a unit. The engine applies the returned values.

pub mod damage;
pub mod heal;
pub mod hit;
pub mod result;

pub use damage::{DamageInput, DamageType, base_damage, calculate_damage};
pub use heal::calculate_heal;
pub use hit::{crit_chance, roll_critical, roll_parry};
pub use result::{HitResult, resolve_attack, resolve_skill_hits};
