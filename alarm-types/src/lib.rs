pub mod game;
pub mod messages;
pub mod phrase;

use std::fmt;
use uuid::Uuid;

// Re-export all types
pub use game::*;
pub use messages::*;
pub use phrase::*;

/// Room code. Always stored lower-case.
pub type GameId = String;

/// Persistent player identifier, doubles as the reconnection token. Case-sensitive.
pub type PlayerId = String;

/// Identifies one live transport connection (one browser tab, one device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
