use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameId, PersonalStats, PhraseRecord, PlayerId, Score};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    CreateGame,
    SubscribeToGame {
        game_id: GameId,
        player_id: Option<PlayerId>,
    },
    UnsubscribeFromGame { game_id: GameId },
    Ready { game_id: GameId },
    ClickPhrase {
        game_id: GameId,
        player_id: PlayerId,
        phrase: String,
    },
    Heartbeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    GameCreated { game_id: GameId },
    SetPlayerId { player_id: PlayerId },
    /// `None` once the player has said every phrase they were dealt.
    UpdatePhrase { phrase: Option<PhraseRecord> },
    /// Sorted by phrase text, at most four entries.
    UpdateButtons { buttons: Vec<PhraseRecord> },
    StartGame,
    StartTimer { duration_ms: u32 },
    UpdateScore { score: Score },
    UpdatePlayerCount { count: u32 },
    GameOver { stats: PersonalStats },
    GameInProgressError,
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_json_shape() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"ClickPhrase":{"game_id":"abcd","player_id":"Xy12","phrase":"Duck!"}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::ClickPhrase {
                game_id,
                player_id,
                phrase,
            } => {
                assert_eq!(game_id, "abcd");
                assert_eq!(player_id, "Xy12");
                assert_eq!(phrase, "Duck!");
            }
            other => panic!("Unexpected message: {:?}", other),
        }

        let subscribe: ClientMessage =
            serde_json::from_str(r#"{"SubscribeToGame":{"game_id":"abcd","player_id":null}}"#)
                .unwrap();
        assert!(matches!(
            subscribe,
            ClientMessage::SubscribeToGame { player_id: None, .. }
        ));
    }

    #[test]
    fn test_unit_variants_serialize_as_strings() {
        assert_eq!(
            serde_json::to_string(&ServerMessage::StartGame).unwrap(),
            "\"StartGame\""
        );
        let heartbeat: ClientMessage = serde_json::from_str("\"Heartbeat\"").unwrap();
        assert!(matches!(heartbeat, ClientMessage::Heartbeat));
    }
}
