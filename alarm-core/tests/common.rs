#![allow(dead_code)]

use alarm_core::{ConnectionHandle, Game, PhraseCatalog, PlayerDirectory};
use alarm_types::{PhraseRecord, PlayerId, ServerMessage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Creates a catalog of `count` distinct phrases
pub fn create_test_catalog(count: usize) -> Arc<PhraseCatalog> {
    let phrases = (1..=count)
        .map(|i| PhraseRecord::new(format!("Test phrase {}", i), "Test"))
        .collect();
    Arc::new(PhraseCatalog::new(phrases).unwrap())
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A player registered in the directory plus the receiving end of its connection
pub struct TestPlayer {
    pub id: PlayerId,
    pub receiver: UnboundedReceiver<ServerMessage>,
}

impl TestPlayer {
    /// Everything sent to this player since the last drain
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            messages.push(message);
        }
        messages
    }
}

/// Registers a player and clears the SetPlayerId greeting
pub fn create_test_player(directory: &mut PlayerDirectory) -> TestPlayer {
    let (connection, receiver) = ConnectionHandle::channel();
    let id = directory.register(connection);
    let mut player = TestPlayer { id, receiver };
    player.drain();
    player
}

/// A game with `num_players` players on the roster, no round started yet
pub fn create_test_game(
    catalog: Arc<PhraseCatalog>,
    num_players: usize,
) -> (Game, PlayerDirectory, Vec<TestPlayer>) {
    let mut directory = PlayerDirectory::new();
    let mut game = Game::new("test", catalog);
    let players: Vec<TestPlayer> = (0..num_players)
        .map(|_| create_test_player(&mut directory))
        .collect();
    for player in &players {
        game.add_player(&player.id);
    }
    (game, directory, players)
}

/// A game with a round already dealt and all start-of-round messages drained
pub fn create_started_game(
    catalog_size: usize,
    num_players: usize,
    seed: u64,
) -> (Game, PlayerDirectory, Vec<TestPlayer>) {
    let (mut game, mut directory, mut players) =
        create_test_game(create_test_catalog(catalog_size), num_players);
    game.generate_round_with(&mut directory, &mut seeded_rng(seed))
        .unwrap();
    for player in &mut players {
        player.drain();
    }
    (game, directory, players)
}

/// The phrase `player_id` is currently meant to say
pub fn active_phrase(directory: &PlayerDirectory, player_id: &str) -> Option<String> {
    directory
        .player(player_id)
        .and_then(|p| p.active_phrase())
        .map(|p| p.phrase.clone())
}

pub fn phrase_texts<'a>(records: impl IntoIterator<Item = &'a PhraseRecord>) -> Vec<String> {
    let mut texts: Vec<String> = records.into_iter().map(|r| r.phrase.clone()).collect();
    texts.sort();
    texts
}
