//! Runtime orchestration for turn-based tactical encounters.
//!
//! This crate wires together the command provider abstraction, oracle access,
//! session repositories, and the simulation worker into a cohesive runtime
//! API. Consumers embed [`Runtime`] to drive an encounter, subscribe to
//! presentation events, and save or load sessions through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] and [`repository`] provide data adapters
//! - [`config`] and [`logging`] carry the ambient setup
pub mod api;
pub mod config;
pub mod events;
pub mod logging;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    CommandProvider, EndPhaseProvider, PlannedCommand, Result, RuntimeError, RuntimeHandle,
    ScriptedProvider,
};
pub use config::{LogConfig, RuntimeConfig, default_save_dir};
pub use events::{Event, EventBus, Topic};
pub use oracle::OracleManager;
pub use repository::{
    FileSessionRepository, InMemorySessionRepository, RepositoryError, SessionRepository,
};
pub use runtime::{Runtime, RuntimeBuilder};
