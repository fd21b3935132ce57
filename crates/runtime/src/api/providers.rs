//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`CommandProvider`] implementations so the player
//! phase can be driven by human input, scripted fixtures, or test doubles.
//! The enemy phase never asks a provider; the engine plays it.
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tactics_core::{EncounterState, PlayerCommand};

use super::errors::{Result, RuntimeError};

#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Next command for the current state, or `None` when the provider has
    /// nothing more to say.
    async fn provide_command(&self, state: &EncounterState) -> Result<Option<PlayerCommand>>;
}

/// Always ends the player phase. Useful for letting enemies play out.
pub struct EndPhaseProvider;

#[async_trait]
impl CommandProvider for EndPhaseProvider {
    async fn provide_command(&self, _state: &EncounterState) -> Result<Option<PlayerCommand>> {
        Ok(Some(PlayerCommand::EndPhase))
    }
}

/// Replays a fixed list of commands, then stops.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    commands: Mutex<VecDeque<PlayerCommand>>,
}

impl ScriptedProvider {
    pub fn new(commands: impl IntoIterator<Item = PlayerCommand>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> Result<usize> {
        let queue = self
            .commands
            .lock()
            .map_err(|_| RuntimeError::ProviderPoisoned)?;
        Ok(queue.len())
    }
}

#[async_trait]
impl CommandProvider for ScriptedProvider {
    async fn provide_command(&self, _state: &EncounterState) -> Result<Option<PlayerCommand>> {
        let mut queue = self
            .commands
            .lock()
            .map_err(|_| RuntimeError::ProviderPoisoned)?;
        Ok(queue.pop_front())
    }
}
