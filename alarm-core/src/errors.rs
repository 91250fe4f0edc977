use alarm_types::{GameId, PlayerId};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Game not found: {game_id}")]
    UnknownGame { game_id: GameId },
    #[error("Player not found: {player_id}")]
    UnknownPlayer { player_id: PlayerId },
    #[error("Need at least {required} players to start a round, have {present}")]
    NotEnoughPlayers { required: usize, present: usize },
    #[error("No round in progress in game {game_id}")]
    RoundNotActive { game_id: GameId },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read phrase catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid phrase catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Phrase catalog is empty")]
    Empty,
    #[error("Duplicate phrase in catalog: {phrase}")]
    DuplicatePhrase { phrase: String },
}
