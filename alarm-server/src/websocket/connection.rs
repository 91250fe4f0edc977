use alarm_core::ConnectionHandle;
use alarm_types::{ConnectionId, ServerMessage};
use std::collections::HashMap;
use tracing::debug;

/// Every open socket, so replies can reach connections that are not
/// (yet) attached to a player.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_connection(&mut self, connection: ConnectionHandle) {
        self.connections.insert(connection.id(), connection);
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<ConnectionHandle> {
        self.connections.remove(&id)
    }

    pub fn get_connection(&self, id: ConnectionId) -> Option<&ConnectionHandle> {
        self.connections.get(&id)
    }

    pub fn send_message(&self, id: ConnectionId, message: ServerMessage) -> bool {
        match self.connections.get(&id) {
            Some(connection) => connection.send(message),
            None => {
                debug!("No connection {} to send to", id);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
