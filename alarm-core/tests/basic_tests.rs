mod common;

use alarm_core::{Game, GameDirectory, MIN_PLAYERS_PER_ROUND, PhraseCatalog, PlayerDirectory};
use alarm_types::RoundPhase;
use common::*;
use std::sync::Arc;

#[test]
fn test_game_creation() {
    let game = Game::new("ABCD", create_test_catalog(4));
    assert_eq!(game.id(), "abcd");
    assert_eq!(game.player_count(), 0);
    assert!(!game.is_started());
    assert!(!game.is_game_over());
    assert_eq!(game.score().num_correct, 0);
    assert_eq!(game.score().num_incorrect, 0);
    assert_eq!(game.phase(), RoundPhase::Waiting);
    assert!(game.pending_deadline().is_none());
}

#[test]
fn test_add_and_remove_players() {
    let (mut game, _directory, players) = create_test_game(create_test_catalog(4), 2);
    assert_eq!(game.player_count(), 2);

    // Adding twice does not duplicate the roster entry
    assert!(!game.add_player(&players[0].id));
    assert_eq!(game.player_count(), 2);

    assert!(game.remove_player(&players[0].id));
    assert!(!game.contains_player(&players[0].id));
    assert!(!game.remove_player(&players[0].id));
    assert_eq!(game.player_count(), 1);
}

#[test]
fn test_player_count_broadcast() {
    let (game, directory, mut players) = create_test_game(create_test_catalog(4), 3);
    game.emit_player_count(&directory);

    for player in &mut players {
        assert_eq!(
            player.drain(),
            vec![alarm_types::ServerMessage::UpdatePlayerCount { count: 3 }]
        );
    }
}

#[test]
fn test_builtin_catalog_round() {
    let catalog = Arc::new(PhraseCatalog::builtin().unwrap());
    let mut games = GameDirectory::new(catalog.clone());
    let mut directory = PlayerDirectory::new();
    let game_id = games.create_game();

    let players: Vec<TestPlayer> = (0..MIN_PLAYERS_PER_ROUND)
        .map(|_| create_test_player(&mut directory))
        .collect();
    let game = games.get_or_create(&game_id);
    for player in &players {
        game.add_player(&player.id);
    }

    game.generate_round(&mut directory).unwrap();

    let dealt: usize = players
        .iter()
        .map(|p| directory.player(&p.id).unwrap().phrases().len())
        .sum();
    assert_eq!(dealt, catalog.len());
    assert_eq!(game.phase(), RoundPhase::RoundActive);
}
