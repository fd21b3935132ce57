//! Topic-based event bus for runtime events.
//!
//! Committed actions produce core [`GameEvent`]s; the runtime routes each one
//! to a topic so presentation layers subscribe only to what they draw.

mod bus;

pub use bus::{Event, EventBus, Topic};
pub use tactics_core::GameEvent;
