//! Encounter runtime: worker task, providers and persistence.
//!
//! The runtime owns the simulation worker, wires up the command channel and
//! event bus, sources player commands from an optional provider, and saves or
//! loads sessions through an optional repository.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use tactics_core::{EncounterState, GameEvent};

use crate::api::{CommandProvider, Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::oracle::OracleManager;
use crate::repository::SessionRepository;
use crate::workers::{Command, SimulationWorker};

/// A running encounter.
///
/// Clients talk to it through [`RuntimeHandle`] clones.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,
    provider: Option<Box<dyn CommandProvider>>,
    repository: Option<Arc<dyn SessionRepository>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Handle for issuing commands from other tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    pub fn set_provider(&mut self, provider: impl CommandProvider + 'static) {
        self.provider = Some(Box::new(provider));
    }

    /// Asks the provider for one command and submits it.
    ///
    /// Returns `Ok(false)` when the encounter is decided or the provider has
    /// nothing more to submit.
    pub async fn step(&mut self) -> Result<bool> {
        let provider = self.provider.as_ref().ok_or(RuntimeError::ProviderNotSet)?;

        let state = self.handle.query_state().await?;
        if state.outcome.is_some() {
            return Ok(false);
        }
        let Some(command) = provider.provide_command(&state).await? else {
            return Ok(false);
        };
        self.handle.submit(command).await?;
        Ok(true)
    }

    /// Steps until the encounter ends or the provider runs dry.
    pub async fn run(&mut self) -> Result<EncounterState> {
        while self.step().await? {}
        self.handle.query_state().await
    }

    pub async fn start_encounter(&self) -> Result<Vec<GameEvent>> {
        self.handle.start_encounter().await
    }

    /// Saves the current session under the configured session id.
    pub async fn save(&self) -> Result<()> {
        let repository = self
            .repository
            .as_ref()
            .ok_or(RuntimeError::RepositoryNotSet)?;
        let snapshot = self.handle.snapshot().await?;
        let session_id = &self.config.session_id;

        repository.save(session_id, &snapshot).map_err(|err| {
            warn!(session = %session_id, "Failed to save session: {}", err);
            RuntimeError::from(err)
        })?;
        info!(session = %session_id, turn = snapshot.turn, "Session saved");
        Ok(())
    }

    /// Replaces the encounter with the session saved under the configured id.
    pub async fn load(&self) -> Result<()> {
        let repository = self
            .repository
            .as_ref()
            .ok_or(RuntimeError::RepositoryNotSet)?;
        let session_id = &self.config.session_id;

        let snapshot = repository
            .load(session_id)
            .map_err(|err| {
                warn!(session = %session_id, "Failed to load session: {}", err);
                RuntimeError::from(err)
            })?
            .ok_or_else(|| RuntimeError::SessionNotFound(session_id.clone()))?;
        self.handle.restore(snapshot).await
    }

    /// Waits for the worker to stop once every handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Assembles a [`Runtime`] from state, catalogs and optional services.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<EncounterState>,
    oracles: Option<OracleManager>,
    provider: Option<Box<dyn CommandProvider>>,
    repository: Option<Arc<dyn SessionRepository>>,
    start_encounter: bool,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            oracles: None,
            provider: None,
            repository: None,
            start_encounter: true,
        }
    }

    /// Replaces the default configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the encounter to run
    pub fn initial_state(mut self, state: EncounterState) -> Self {
        self.state = Some(state);
        self
    }

    /// Content catalogs. Required.
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    pub fn provider(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn repository(mut self, repository: Arc<dyn SessionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Open the first player phase on build (default: true). Turn this off
    /// when the initial state is a restored, already running session.
    pub fn start_encounter(mut self, start: bool) -> Self {
        self.start_encounter = start;
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let state = self.state.ok_or(RuntimeError::MissingState)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            state,
            oracles,
            command_rx,
            event_bus,
            self.config.auto_end_player_phase,
            self.config.free_control,
        );
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        if self.start_encounter {
            handle.start_encounter().await?;
        }

        Ok(Runtime {
            handle,
            config: self.config,
            provider: self.provider,
            repository: self.repository,
            sim_worker_handle,
        })
    }
}
