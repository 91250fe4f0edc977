use alarm_types::{GameId, GameSnapshot, PlayerId, RoundPhase, Score, ServerMessage};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::{
    Deadline, DeadlineToken, GameError, PhraseCatalog, Player, PlayerDirectory, RoundTimer,
    ScoringEngine, deal_phrases,
};

/// Fewer players than this cannot be dealt a round: nobody would be left to listen.
pub const MIN_PLAYERS_PER_ROUND: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The tapped phrase was someone's active phrase.
    Correct { speaker: PlayerId },
    /// Nobody is saying that phrase (never dealt, or already heard).
    Incorrect,
}

/// One room: its roster, the round in progress and the countdown.
///
/// Players themselves live in the [`PlayerDirectory`]; the game keeps
/// their ids and borrows the directory for every operation that touches
/// player state.
#[derive(Debug)]
pub struct Game {
    id: GameId,
    roster: Vec<PlayerId>,
    started: bool,
    game_over: bool,
    score: Score,
    timer: RoundTimer,
    catalog: Arc<PhraseCatalog>,
    created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(id: &str, catalog: Arc<PhraseCatalog>) -> Self {
        Self {
            id: id.to_lowercase(),
            roster: Vec::new(),
            started: false,
            game_over: false,
            score: Score::default(),
            timer: RoundTimer::new(),
            catalog,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn add_player(&mut self, player_id: &str) -> bool {
        if self.contains_player(player_id) {
            return false;
        }
        self.roster.push(player_id.to_string());
        true
    }

    pub fn remove_player(&mut self, player_id: &str) -> bool {
        let before = self.roster.len();
        self.roster.retain(|id| id != player_id);
        self.roster.len() != before
    }

    pub fn contains_player(&self, player_id: &str) -> bool {
        self.roster.iter().any(|id| id == player_id)
    }

    pub fn player_ids(&self) -> &[PlayerId] {
        &self.roster
    }

    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn phase(&self) -> RoundPhase {
        if self.started {
            RoundPhase::RoundActive
        } else if self.game_over {
            RoundPhase::RoundOver
        } else {
            RoundPhase::Waiting
        }
    }

    /// Full countdown for the current score.
    pub fn max_time(&self) -> Duration {
        ScoringEngine::max_time(self.score)
    }

    pub fn pending_deadline(&self) -> Option<Deadline> {
        self.timer.pending()
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed(Instant::now())
    }

    pub fn generate_round(&mut self, players: &mut PlayerDirectory) -> Result<(), GameError> {
        self.generate_round_with(players, &mut rand::thread_rng())
    }

    /// Deal the whole catalog across the roster and start the countdown.
    pub fn generate_round_with<R: Rng + ?Sized>(
        &mut self,
        players: &mut PlayerDirectory,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let player_ids: Vec<PlayerId> = self
            .roster
            .iter()
            .filter(|id| players.contains(id))
            .cloned()
            .collect();

        if player_ids.len() < MIN_PLAYERS_PER_ROUND {
            return Err(GameError::NotEnoughPlayers {
                required: MIN_PLAYERS_PER_ROUND,
                present: player_ids.len(),
            });
        }

        let deal = deal_phrases(&player_ids, self.catalog.phrases(), rng);

        for id in &player_ids {
            if let Some(player) = players.player_mut(id) {
                player.reset();
            }
        }
        for assignment in deal {
            if let Some(speaker) = players.player_mut(&assignment.speaker) {
                speaker.assign_phrase(assignment.phrase.clone());
            }
            if let Some(listener) = players.player_mut(&assignment.listener) {
                listener.assign_button(assignment.phrase);
            }
        }

        self.started = true;
        self.game_over = false;
        self.score = Score::default();
        info!(
            "Game {} round started: {} phrases across {} players",
            self.id,
            self.catalog.len(),
            player_ids.len()
        );

        self.for_each_player(players, Player::emit_start_game);
        self.start_timer(players, Instant::now());
        self.emit_score(players);
        Ok(())
    }

    pub fn handle_click_phrase(
        &mut self,
        players: &mut PlayerDirectory,
        phrase: &str,
        player_id: &str,
    ) -> Result<GuessOutcome, GameError> {
        self.handle_click_phrase_at(players, phrase, player_id, Instant::now())
    }

    /// Score a tap on `phrase` by `player_id`, as of `now`.
    pub fn handle_click_phrase_at(
        &mut self,
        players: &mut PlayerDirectory,
        phrase: &str,
        player_id: &str,
        now: Instant,
    ) -> Result<GuessOutcome, GameError> {
        if !self.contains_player(player_id) || !players.contains(player_id) {
            return Err(GameError::UnknownPlayer {
                player_id: player_id.to_string(),
            });
        }
        if !self.started {
            return Err(GameError::RoundNotActive {
                game_id: self.id.clone(),
            });
        }

        let speaker_id = self
            .roster
            .iter()
            .find(|id| {
                players
                    .player(id)
                    .and_then(Player::active_phrase)
                    .is_some_and(|active| active.phrase == phrase)
            })
            .cloned();

        let outcome = match speaker_id {
            Some(speaker_id) => {
                info!("Game {} CORRECT: '{}' said by {}", self.id, phrase, speaker_id);
                if let Some(speaker) = players.player_mut(&speaker_id) {
                    speaker.advance_phrase();
                    speaker.record_others_clicked();
                }
                if let Some(guesser) = players.player_mut(player_id) {
                    guesser.resolve_button(phrase);
                    guesser.record_correct_click();
                }
                // Whoever else was listening for it loses the button too
                for id in &self.roster {
                    if id == player_id {
                        continue;
                    }
                    if let Some(listener) = players.player_mut(id) {
                        if listener.buttons().iter().any(|b| b.phrase == phrase) {
                            listener.resolve_button(phrase);
                        }
                    }
                }

                self.score.num_correct += 1;
                self.start_timer(players, now);
                GuessOutcome::Correct {
                    speaker: speaker_id,
                }
            }
            None => {
                info!("Game {} INCORRECT: '{}' from {}", self.id, phrase, player_id);
                self.score.num_incorrect += 1;
                if let Some(guesser) = players.player_mut(player_id) {
                    guesser.record_incorrect_click();
                }

                // Recomputed with the new penalty before shrinking what is left
                let remaining = self.max_time().saturating_sub(self.timer.elapsed(now));
                self.update_timer(now, remaining);
                GuessOutcome::Incorrect
            }
        };

        self.emit_score(players);
        Ok(outcome)
    }

    /// Restart the countdown from full and tell everyone.
    fn start_timer(&mut self, players: &PlayerDirectory, now: Instant) {
        let duration = self.max_time();
        self.timer.restart(now, duration);

        let duration_ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        self.for_each_player(players, |player| {
            player.emit(ServerMessage::StartTimer { duration_ms })
        });
    }

    /// Move the deadline without resetting the visible countdown.
    fn update_timer(&mut self, now: Instant, remaining: Duration) {
        self.timer.reschedule(now, remaining);
    }

    /// Handle a deadline firing. Returns false for superseded deadlines.
    pub fn fire_deadline(&mut self, players: &PlayerDirectory, token: DeadlineToken) -> bool {
        if !self.timer.fire(token) {
            tracing::debug!("Game {} ignoring stale deadline {}", self.id, token);
            return false;
        }
        self.end_round(players);
        true
    }

    /// Finish the round and send every player their own stats.
    pub fn end_round(&mut self, players: &PlayerDirectory) {
        self.timer.cancel();
        self.game_over = true;
        self.started = false;
        info!(
            "Game {} round over: {} correct, {} incorrect",
            self.id, self.score.num_correct, self.score.num_incorrect
        );
        self.for_each_player(players, Player::emit_game_over);
    }

    pub fn emit_player_count(&self, players: &PlayerDirectory) {
        let count = u32::try_from(self.roster.len()).unwrap_or(u32::MAX);
        self.for_each_player(players, |player| player.emit_player_count(count));
    }

    pub fn emit_score(&self, players: &PlayerDirectory) {
        let score = self.score;
        self.for_each_player(players, |player| player.emit_score(score));
    }

    pub fn for_each_player(&self, players: &PlayerDirectory, mut f: impl FnMut(&Player)) {
        for id in &self.roster {
            if let Some(player) = players.player(id) {
                f(player);
            }
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id.clone(),
            phase: self.phase(),
            started: self.started,
            game_over: self.game_over,
            player_count: u32::try_from(self.roster.len()).unwrap_or(u32::MAX),
            score: self.score,
            created_at: self.created_at.to_rfc3339(),
        }
    }
}
