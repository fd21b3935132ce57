//! Worker task that backs the runtime orchestration.
//!
//! The simulation worker owns the authoritative encounter and executes
//! commands sent through [`crate::RuntimeHandle`].

mod simulation;

pub use simulation::{Command, SimulationWorker};
