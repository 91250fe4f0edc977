use alarm_core::{
    ConnectionHandle, DeadlineToken, Game, GameDirectory, GameError, PhraseCatalog,
    PlayerDirectory,
};
use alarm_types::{ClientMessage, ConnectionId, GameId, GameSnapshot, ServerMessage};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::websocket::ConnectionManager;

#[derive(Debug, Error)]
pub enum HubError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Unknown connection {connection_id}")]
    UnknownConnection { connection_id: ConnectionId },
    #[error("Game hub is not running")]
    Closed,
}

/// Everything that can change game state, applied one at a time.
#[derive(Debug)]
pub enum HubCommand {
    Connect {
        connection: ConnectionHandle,
    },
    Client {
        connection_id: ConnectionId,
        message: ClientMessage,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
    Deadline {
        game_id: GameId,
        token: DeadlineToken,
    },
    Snapshot {
        game_id: GameId,
        reply: oneshot::Sender<Option<GameSnapshot>>,
    },
}

/// Cloneable sender side of the hub queue, handed to every socket task.
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<HubCommand>,
}

impl HubHandle {
    pub fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands.send(command).map_err(|_| HubError::Closed)
    }

    /// Register a new connection and get the stream of messages meant for it.
    pub fn connect(
        &self,
    ) -> Result<(ConnectionId, mpsc::UnboundedReceiver<ServerMessage>), HubError> {
        let (connection, receiver) = ConnectionHandle::channel();
        let connection_id = connection.id();
        self.send(HubCommand::Connect { connection })?;
        Ok((connection_id, receiver))
    }

    pub fn client_message(
        &self,
        connection_id: ConnectionId,
        message: ClientMessage,
    ) -> Result<(), HubError> {
        self.send(HubCommand::Client {
            connection_id,
            message,
        })
    }

    pub fn disconnect(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.send(HubCommand::Disconnect { connection_id })
    }

    /// Public view of a room. Also acts as a barrier: every command sent
    /// before it has been applied once it resolves.
    pub async fn snapshot(&self, game_id: &str) -> Result<Option<GameSnapshot>, HubError> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::Snapshot {
            game_id: game_id.to_string(),
            reply,
        })?;
        response.await.map_err(|_| HubError::Closed)
    }
}

#[derive(Debug)]
struct ArmedDeadline {
    token: DeadlineToken,
    task: JoinHandle<()>,
}

/// Sole owner of every game, player and connection.
///
/// Runs on one task and applies [`HubCommand`]s in arrival order, so no
/// two operations ever interleave. Round deadlines are sleeping tasks
/// that feed a [`HubCommand::Deadline`] back into the same queue.
pub struct GameHub {
    pub(crate) games: GameDirectory,
    pub(crate) players: PlayerDirectory,
    pub(crate) connections: ConnectionManager,
    timers: HashMap<GameId, ArmedDeadline>,
    commands: mpsc::WeakUnboundedSender<HubCommand>,
}

impl GameHub {
    /// A hub plus its queue. The hub only keeps a weak sender, so it stops
    /// once every [`HubHandle`] is gone.
    pub fn channel(
        catalog: Arc<PhraseCatalog>,
    ) -> (Self, HubHandle, mpsc::UnboundedReceiver<HubCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let hub = Self {
            games: GameDirectory::new(catalog),
            players: PlayerDirectory::new(),
            connections: ConnectionManager::new(),
            timers: HashMap::new(),
            commands: sender.downgrade(),
        };
        (hub, HubHandle { commands: sender }, receiver)
    }

    pub fn spawn(catalog: Arc<PhraseCatalog>) -> (HubHandle, JoinHandle<()>) {
        let (hub, handle, receiver) = Self::channel(catalog);
        let task = tokio::spawn(hub.run(receiver));
        (handle, task)
    }

    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<HubCommand>) {
        info!("Game hub started");
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        for (_, armed) in self.timers.drain() {
            armed.task.abort();
        }
        info!("Game hub stopped");
    }

    pub fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Connect { connection } => {
                debug!("Connection {} opened", connection.id());
                self.connections.add_connection(connection);
            }
            HubCommand::Client {
                connection_id,
                message,
            } => self.handle_client_message(connection_id, message),
            HubCommand::Disconnect { connection_id } => self.handle_disconnect(connection_id),
            HubCommand::Deadline { game_id, token } => self.handle_deadline(&game_id, token),
            HubCommand::Snapshot { game_id, reply } => {
                let snapshot = self.games.get(&game_id).map(Game::snapshot);
                if reply.send(snapshot).is_err() {
                    debug!("Snapshot requester for {} went away", game_id);
                }
            }
        }
    }

    pub fn games(&self) -> &GameDirectory {
        &self.games
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Token of the deadline task currently sleeping for `game_id`.
    pub fn armed_deadline(&self, game_id: &str) -> Option<DeadlineToken> {
        self.timers.get(game_id).map(|armed| armed.token)
    }

    fn handle_deadline(&mut self, game_id: &str, token: DeadlineToken) {
        match self.games.get_mut(game_id) {
            Some(game) => {
                if game.fire_deadline(&self.players, token) {
                    info!("Game {} ran out of time", game_id);
                }
            }
            None => warn!("Deadline for unknown game {}", game_id),
        }
        self.sync_timer(game_id);
    }

    /// Close one socket. The player leaves their rooms only when this was
    /// their last connection.
    fn handle_disconnect(&mut self, connection_id: ConnectionId) {
        self.connections.remove_connection(connection_id);
        let Some(player_id) = self.players.detach(connection_id) else {
            debug!("Connection {} closed without a player", connection_id);
            return;
        };

        self.leave_if_disconnected(&player_id);
    }

    /// Take `player_id` off every roster once none of their connections
    /// remain.
    pub(crate) fn leave_if_disconnected(&mut self, player_id: &str) {
        let still_connected = self
            .players
            .player(player_id)
            .is_some_and(|player| player.connection_count() > 0);
        if still_connected {
            debug!("Player {} still has open connections", player_id);
            return;
        }

        let game_ids: Vec<GameId> = self.games.ids().cloned().collect();
        for game_id in game_ids {
            if let Some(game) = self.games.get_mut(&game_id) {
                if game.remove_player(player_id) {
                    info!("Player {} left game {} (disconnected)", player_id, game_id);
                    game.emit_player_count(&self.players);
                }
            }
        }
    }

    /// Make the armed task for `game_id` match the game's pending deadline.
    pub(crate) fn sync_timer(&mut self, game_id: &str) {
        let pending = self.games.get(game_id).and_then(Game::pending_deadline);
        let armed = self.timers.get(game_id).map(|armed| armed.token);
        if pending.map(|deadline| deadline.token) == armed {
            return;
        }

        if let Some(previous) = self.timers.remove(game_id) {
            previous.task.abort();
        }
        let Some(deadline) = pending else {
            return;
        };

        let commands = self.commands.clone();
        let target = game_id.to_string();
        let token = deadline.token;
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline.due)).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(HubCommand::Deadline {
                    game_id: target,
                    token,
                });
            }
        });
        debug!("Armed deadline {} for game {}", token, game_id);
        self.timers
            .insert(game_id.to_string(), ArmedDeadline { token, task });
    }

    pub(crate) fn reply(&self, connection_id: ConnectionId, message: ServerMessage) {
        self.connections.send_message(connection_id, message);
    }
}
