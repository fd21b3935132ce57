//! Repository layer for dynamic runtime data
//!
//! Repositories persist what CHANGES during play: encounter sessions.
//! Static content (skills, units, elements) is served by the oracles.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSessionRepository;
pub use memory::InMemorySessionRepository;
pub use traits::SessionRepository;
