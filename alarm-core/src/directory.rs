use alarm_types::{ConnectionId, GameId, PlayerId};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::{ConnectionHandle, Game, PhraseCatalog, Player};

pub const PLAYER_ID_LENGTH: usize = 32;
pub const GAME_ID_LENGTH: usize = 4;

/// 32 alphanumeric characters, case-sensitive.
pub fn new_player_id<R: Rng + ?Sized>(rng: &mut R) -> PlayerId {
    (0..PLAYER_ID_LENGTH)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Four lower-case letters.
pub fn new_game_id<R: Rng + ?Sized>(rng: &mut R) -> GameId {
    (0..GAME_ID_LENGTH)
        .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
        .collect()
}

/// Result of attaching a connection to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// The requested id was known; the connection joined that player.
    Existing(PlayerId),
    /// A fresh player was created for the connection.
    Created(PlayerId),
}

impl Attachment {
    pub fn player_id(&self) -> &PlayerId {
        match self {
            Attachment::Existing(id) | Attachment::Created(id) => id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Attachment::Created(_))
    }
}

/// Every player known to the process, by id and by connection.
///
/// Players outlive their place on a game roster so that a reconnect with
/// the same id picks up the round where it left off.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    players: HashMap<PlayerId, Player>,
    by_connection: HashMap<ConnectionId, PlayerId>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a player for `connection` and tell it its id.
    pub fn register(&mut self, connection: ConnectionHandle) -> PlayerId {
        let mut rng = rand::thread_rng();
        let mut player_id = new_player_id(&mut rng);
        while self.players.contains_key(&player_id) {
            player_id = new_player_id(&mut rng);
        }

        self.by_connection.insert(connection.id(), player_id.clone());
        let player = Player::new(player_id.clone(), connection);
        player.emit_player_id();
        self.players.insert(player_id.clone(), player);

        info!("Created player {}", player_id);
        player_id
    }

    /// Attach `connection` to `player_id` if it is known, otherwise create a new player.
    pub fn attach(&mut self, connection: ConnectionHandle, player_id: Option<&str>) -> Attachment {
        if let Some(player_id) = player_id {
            if let Some(player) = self.players.get_mut(player_id) {
                self.by_connection
                    .insert(connection.id(), player_id.to_string());
                player.attach(connection);
                return Attachment::Existing(player_id.to_string());
            }
            info!("Didn't find player {}, creating", player_id);
        }

        Attachment::Created(self.register(connection))
    }

    /// Remove one connection from its player's fan-out list.
    pub fn detach(&mut self, connection_id: ConnectionId) -> Option<PlayerId> {
        let player_id = self.by_connection.remove(&connection_id)?;
        if let Some(player) = self.players.get_mut(&player_id) {
            player.detach(connection_id);
        }
        Some(player_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.get_mut(player_id)
    }

    pub fn player_for_connection(&self, connection_id: ConnectionId) -> Option<&PlayerId> {
        self.by_connection.get(&connection_id)
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Every room, by lower-cased code.
#[derive(Debug)]
pub struct GameDirectory {
    games: HashMap<GameId, Game>,
    catalog: Arc<PhraseCatalog>,
}

impl GameDirectory {
    pub fn new(catalog: Arc<PhraseCatalog>) -> Self {
        Self {
            games: HashMap::new(),
            catalog,
        }
    }

    /// Create a room under a fresh random code.
    pub fn create_game(&mut self) -> GameId {
        let mut rng = rand::thread_rng();
        let mut game_id = new_game_id(&mut rng);
        while self.games.contains_key(&game_id) {
            game_id = new_game_id(&mut rng);
        }
        self.insert(&game_id);
        game_id
    }

    /// Look up a room, creating it under exactly this code if it does not exist.
    pub fn get_or_create(&mut self, game_id: &str) -> &mut Game {
        let catalog = &self.catalog;
        self.games
            .entry(game_id.to_lowercase())
            .or_insert_with_key(|id| {
                info!("Created game {}", id);
                Game::new(id, catalog.clone())
            })
    }

    pub fn get(&self, game_id: &str) -> Option<&Game> {
        self.games.get(&game_id.to_lowercase())
    }

    pub fn get_mut(&mut self, game_id: &str) -> Option<&mut Game> {
        self.games.get_mut(&game_id.to_lowercase())
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.games.contains_key(&game_id.to_lowercase())
    }

    pub fn ids(&self) -> impl Iterator<Item = &GameId> {
        self.games.keys()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn insert(&mut self, game_id: &str) {
        info!("Created game {}", game_id);
        self.games
            .insert(game_id.to_string(), Game::new(game_id, self.catalog.clone()));
    }
}
