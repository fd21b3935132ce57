//! Simulation worker that owns the authoritative [`EncounterState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], executes them through
//! [`TurnEngine`], and publishes the resulting events to the EventBus.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use tactics_core::{
    EncounterState, GameError, GameEvent, Phase, PlayerCommand, SessionSnapshot, TurnEngine,
};

use crate::api::{PlannedCommand, Result};
use crate::events::{Event, EventBus};
use crate::oracle::OracleManager;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Compute and commit a player command.
    Submit {
        command: PlayerCommand,
        reply: oneshot::Sender<Result<Vec<GameEvent>>>,
    },
    /// Compute only; the caller commits later.
    Plan {
        command: PlayerCommand,
        reply: oneshot::Sender<Result<PlannedCommand>>,
    },
    Commit {
        planned: Box<PlannedCommand>,
        reply: oneshot::Sender<Result<Vec<GameEvent>>>,
    },
    StartEncounter {
        reply: oneshot::Sender<Vec<GameEvent>>,
    },
    QueryState {
        reply: oneshot::Sender<EncounterState>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Restore {
        snapshot: Box<SessionSnapshot>,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Background task that processes gameplay commands.
///
/// The worker is pure game logic plus event publishing; providers and
/// persistence are orchestrated by [`crate::Runtime`].
pub struct SimulationWorker {
    state: EncounterState,
    oracles: OracleManager,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    auto_end_phase: bool,
    free_control: bool,
}

impl SimulationWorker {
    pub fn new(
        mut state: EncounterState,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        auto_end_phase: bool,
        free_control: bool,
    ) -> Self {
        state.turn.free_control = free_control;
        info!(
            party = state.rosters.party.len(),
            enemies = state.rosters.enemies.len(),
            seed = state.seed,
            "SimulationWorker initialized"
        );

        Self {
            state,
            oracles,
            command_rx,
            event_bus,
            auto_end_phase,
            free_control,
        }
    }

    /// Main worker loop. Ends when every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("SimulationWorker command channel closed");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit { command, reply } => {
                let result = self.submit(&command);
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            Command::Plan { command, reply } => {
                let result = self.plan(&command);
                if reply.send(result).is_err() {
                    debug!("Plan reply channel closed (caller dropped)");
                }
            }
            Command::Commit { planned, reply } => {
                let result = self.commit(*planned);
                if reply.send(result).is_err() {
                    debug!("Commit reply channel closed (caller dropped)");
                }
            }
            Command::StartEncounter { reply } => {
                let events = TurnEngine::new(&mut self.state).start_encounter();
                self.state.turn.free_control = self.free_control;
                self.publish(Phase::Player, &events);
                if reply.send(events).is_err() {
                    debug!("StartEncounter reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(SessionSnapshot::capture(&self.state)).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Restore { snapshot, reply } => {
                let result = self.restore(&snapshot);
                if reply.send(result).is_err() {
                    debug!("Restore reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn submit(&mut self, command: &PlayerCommand) -> Result<Vec<GameEvent>> {
        let planned = self.plan(command)?;
        self.apply(command.as_str(), planned)
    }

    fn plan(&mut self, command: &PlayerCommand) -> Result<PlannedCommand> {
        let env = self.oracles.as_game_env();
        let result = TurnEngine::new(&mut self.state).compute(env, command);
        match result {
            Ok(action) => Ok(PlannedCommand::new(action, &self.state)),
            Err(err) => {
                warn!(
                    command = command.as_str(),
                    code = err.error_code(),
                    "Command rejected: {}",
                    err
                );
                let mut context = err.context_at(self.state.nonce);
                if context.unit.is_none()
                    && let Some(unit) = command.unit()
                {
                    context = context.with_unit(unit);
                }
                self.event_bus.publish(Event::CommandRejected {
                    context,
                    severity: err.severity(),
                    code: err.error_code().to_string(),
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    fn commit(&mut self, planned: PlannedCommand) -> Result<Vec<GameEvent>> {
        if let Err(err) = planned.check_current(&self.state) {
            warn!("Discarding stale plan: {}", err);
            return Err(err);
        }
        self.apply("planned", planned)
    }

    fn apply(&mut self, label: &'static str, planned: PlannedCommand) -> Result<Vec<GameEvent>> {
        let phase_before = self.state.turn.phase;
        let unit = planned.action.unit();
        let env = self.oracles.as_game_env();
        let events = TurnEngine::new(&mut self.state)
            .with_auto_end_phase(self.auto_end_phase)
            .commit(env, planned.action);

        debug!(
            command = label,
            unit = ?unit,
            nonce = self.state.nonce,
            events = events.len(),
            "Command accepted"
        );
        self.publish(phase_before, &events);
        Ok(events)
    }

    fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        let mut state = snapshot.restore(self.oracles.units(), &self.state.grid)?;
        state.turn.free_control = self.free_control;
        info!(
            turn = %state.turn.turn,
            phase = %state.turn.phase,
            "Session restored"
        );
        self.state = state;
        Ok(())
    }

    /// Logs and publishes `events`, tracking the phase they were emitted in.
    fn publish(&self, mut phase: Phase, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::PhaseChanged { phase: next } => {
                    phase = *next;
                    info!(phase = %next, turn = %self.state.turn.turn, "Phase changed");
                }
                GameEvent::EncounterEnded { outcome } => {
                    info!(?outcome, "Encounter ended");
                }
                GameEvent::UnitMoved { .. }
                | GameEvent::DamageApplied { .. }
                | GameEvent::Healed { .. }
                | GameEvent::ModifierApplied { .. }
                    if phase == Phase::Enemy =>
                {
                    debug!(?event, "Enemy decision");
                }
                _ => {}
            }
        }
        self.event_bus.publish_all(events.iter().cloned());
    }
}
