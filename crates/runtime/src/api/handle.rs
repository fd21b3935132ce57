//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting player commands, driving phases, and streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{
    EncounterState, GameEvent, Phase, PlannedAction, PlayerCommand, SessionSnapshot, TurnIndex,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// A validated command waiting for its impact frame.
///
/// Only committable against the state it was planned on; any other accepted
/// command in between makes it stale.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedCommand {
    pub action: PlannedAction,
    pub(crate) nonce: u64,
    pub(crate) turn: TurnIndex,
    pub(crate) phase: Phase,
}

impl PlannedCommand {
    pub(crate) fn new(action: PlannedAction, state: &EncounterState) -> Self {
        Self {
            action,
            nonce: state.nonce,
            turn: state.turn.turn,
            phase: state.turn.phase,
        }
    }

    pub(crate) fn check_current(&self, state: &EncounterState) -> Result<()> {
        if self.nonce == state.nonce
            && self.turn == state.turn.turn
            && self.phase == state.turn.phase
        {
            Ok(())
        } else {
            Err(RuntimeError::StalePlan {
                planned_at: self.nonce,
                current: state.nonce,
            })
        }
    }
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Validates and applies a player command, returning its events.
    ///
    /// A rejected command leaves the encounter untouched.
    pub async fn submit(&self, command: PlayerCommand) -> Result<Vec<GameEvent>> {
        self.request(|reply| Command::Submit { command, reply })
            .await?
    }

    /// Ends the player phase; the enemy phase plays out before this returns.
    pub async fn end_phase(&self) -> Result<Vec<GameEvent>> {
        self.submit(PlayerCommand::EndPhase).await
    }

    /// Validates a command and resolves its rolls without applying it.
    pub async fn plan(&self, command: PlayerCommand) -> Result<PlannedCommand> {
        self.request(|reply| Command::Plan { command, reply })
            .await?
    }

    /// Applies a plan from [`Self::plan`] if the state has not moved on.
    pub async fn commit(&self, planned: PlannedCommand) -> Result<Vec<GameEvent>> {
        self.request(|reply| Command::Commit {
            planned: Box::new(planned),
            reply,
        })
        .await?
    }

    /// Resets turn state and opens the first player phase.
    pub async fn start_encounter(&self) -> Result<Vec<GameEvent>> {
        self.request(|reply| Command::StartEncounter { reply })
            .await
    }

    /// Query the current encounter state (read-only copy)
    pub async fn query_state(&self) -> Result<EncounterState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Replaces the encounter with a restored session on the current grid.
    pub async fn restore(&self, snapshot: SessionSnapshot) -> Result<()> {
        self.request(|reply| Command::Restore {
            snapshot: Box::new(snapshot),
            reply,
        })
        .await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Movement, damage, healing, modifiers, rejections
    /// - `Topic::Turn` - Phase, turn and encounter lifecycle
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }
}
