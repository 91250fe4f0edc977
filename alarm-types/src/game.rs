use crate::GameId;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Aggregate room score for the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Score {
    pub num_correct: u32,
    pub num_incorrect: u32,
}

/// Per-player round statistics, only ever sent to the player they describe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PersonalStats {
    /// Times this player tapped another player's active phrase.
    pub correct_clicks: u32,
    /// Times this player tapped a phrase nobody was saying.
    pub incorrect_clicks: u32,
    /// Times someone else tapped this player's active phrase.
    pub others_clicked: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundPhase {
    Waiting,     // No round has run yet
    RoundActive, // Countdown running
    RoundOver,   // Countdown expired, results on screen
}

/// Read-only view of a room for the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSnapshot {
    pub id: GameId,
    pub phase: RoundPhase,
    pub started: bool,
    pub game_over: bool,
    pub player_count: u32,
    pub score: Score,
    pub created_at: String, // ISO 8601 string
}
