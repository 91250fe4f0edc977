use alarm_types::{ConnectionId, PersonalStats, PhraseRecord, PlayerId, Score, ServerMessage};
use std::collections::VecDeque;

use crate::ConnectionHandle;

/// Most buttons a client is shown at once.
pub const MAX_VISIBLE_BUTTONS: usize = 4;

/// One participant: their round assignment, their stats and every
/// connection they are currently playing through.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    connections: Vec<ConnectionHandle>,
    phrases: VecDeque<PhraseRecord>,
    buttons: Vec<PhraseRecord>,
    stats: PersonalStats,
}

impl Player {
    pub fn new(id: PlayerId, connection: ConnectionHandle) -> Self {
        Self {
            id,
            connections: vec![connection],
            phrases: VecDeque::new(),
            buttons: Vec::new(),
            stats: PersonalStats::default(),
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Clear the round assignment and the per-round counters.
    pub fn reset(&mut self) {
        self.phrases.clear();
        self.buttons.clear();
        self.stats = PersonalStats::default();
    }

    /// Add a connection to the fan-out list. Attaching the same connection twice is a no-op.
    pub fn attach(&mut self, connection: ConnectionHandle) {
        if self.connections.iter().any(|c| c.id() == connection.id()) {
            return;
        }
        self.connections.push(connection);
    }

    pub fn detach(&mut self, connection_id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id() != connection_id);
        self.connections.len() != before
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn assign_phrase(&mut self, phrase: PhraseRecord) {
        self.phrases.push_back(phrase);
    }

    pub fn assign_button(&mut self, phrase: PhraseRecord) {
        self.buttons.push(phrase);
    }

    /// The phrase this player should be saying right now.
    pub fn active_phrase(&self) -> Option<&PhraseRecord> {
        self.phrases.front()
    }

    pub fn phrases(&self) -> &VecDeque<PhraseRecord> {
        &self.phrases
    }

    pub fn buttons(&self) -> &[PhraseRecord] {
        &self.buttons
    }

    pub fn stats(&self) -> PersonalStats {
        self.stats
    }

    /// The first few buttons, sorted by phrase text for a stable layout.
    pub fn visible_buttons(&self) -> Vec<PhraseRecord> {
        let mut visible: Vec<PhraseRecord> = self
            .buttons
            .iter()
            .take(MAX_VISIBLE_BUTTONS)
            .cloned()
            .collect();
        visible.sort_by(|a, b| a.phrase.cmp(&b.phrase));
        visible
    }

    /// Drop the active phrase (someone heard it) and show the next one.
    pub fn advance_phrase(&mut self) -> Option<PhraseRecord> {
        let said = self.phrases.pop_front();
        self.emit_phrase();
        said
    }

    /// Remove the button for `phrase` and show the updated list.
    pub fn resolve_button(&mut self, phrase: &str) -> bool {
        let before = self.buttons.len();
        self.buttons.retain(|button| button.phrase != phrase);
        self.emit_buttons();
        self.buttons.len() != before
    }

    pub(crate) fn record_correct_click(&mut self) {
        self.stats.correct_clicks += 1;
    }

    pub(crate) fn record_incorrect_click(&mut self) {
        self.stats.incorrect_clicks += 1;
    }

    pub(crate) fn record_others_clicked(&mut self) {
        self.stats.others_clicked += 1;
    }

    /// Send to every attached connection.
    pub fn emit(&self, message: ServerMessage) {
        for connection in &self.connections {
            if !connection.send(message.clone()) {
                tracing::debug!(
                    "Dropped message for player {} on closed connection {}",
                    self.id,
                    connection.id()
                );
            }
        }
    }

    pub fn emit_player_id(&self) {
        tracing::info!(
            "Sending player id {} to {} connection(s)",
            self.id,
            self.connections.len()
        );
        self.emit(ServerMessage::SetPlayerId {
            player_id: self.id.clone(),
        });
    }

    pub fn emit_phrase(&self) {
        self.emit(ServerMessage::UpdatePhrase {
            phrase: self.active_phrase().cloned(),
        });
    }

    pub fn emit_buttons(&self) {
        self.emit(ServerMessage::UpdateButtons {
            buttons: self.visible_buttons(),
        });
    }

    /// Everything a client needs to render an in-progress round.
    pub fn emit_start_game(&self) {
        self.emit_phrase();
        self.emit_buttons();
        self.emit(ServerMessage::StartGame);
    }

    pub fn emit_player_count(&self, count: u32) {
        self.emit(ServerMessage::UpdatePlayerCount { count });
    }

    pub fn emit_score(&self, score: Score) {
        self.emit(ServerMessage::UpdateScore { score });
    }

    pub fn emit_game_over(&self) {
        self.emit(ServerMessage::GameOver { stats: self.stats });
    }
}
