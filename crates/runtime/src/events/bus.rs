//! Broadcast channels, one per topic.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tactics_core::{ErrorContext, ErrorSeverity, GameEvent};
use tokio::sync::broadcast;

/// Event categories subscribers can filter on.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Movement, damage, healing, modifiers, deaths, summons, rejections
    Combat,
    /// Phase, turn and encounter lifecycle
    Turn,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Combat, Topic::Turn];
}

/// Everything the runtime broadcasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Game(GameEvent),
    /// A player command failed validation; nothing changed.
    CommandRejected {
        context: ErrorContext,
        severity: ErrorSeverity,
        code: String,
        message: String,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Game(event) if event.is_turn_event() => Topic::Turn,
            Event::Game(_) | Event::CommandRejected { .. } => Topic::Combat,
        }
    }
}

impl From<GameEvent> for Event {
    fn from(event: GameEvent) -> Self {
        Event::Game(event)
    }
}

/// Fan-out of runtime events to any number of subscribers.
///
/// Channels are created once at construction, so publishing and subscribing
/// never lock. Delivery is best-effort: a topic without subscribers drops the
/// event, and a lagging subscriber loses the oldest ones.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// 100 buffered events per topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Lagging receivers drop events older than `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Sends to the event's topic; nobody listening is not an error.
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    pub fn publish_all(&self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Receiver for events published from now on.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// One receiver per requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        // Every topic in `Topic::ALL` has a channel from construction.
        &self.channels[&topic]
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
