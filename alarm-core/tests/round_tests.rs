mod common;

use alarm_core::{GameError, GuessOutcome, PlayerDirectory, ScoringEngine};
use alarm_types::{PersonalStats, RoundPhase, Score, ServerMessage};
use common::*;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Finds a (speaker, listener, phrase) triple that would be a correct guess
fn find_correct_guess(
    game: &alarm_core::Game,
    directory: &PlayerDirectory,
) -> (String, String, String) {
    for speaker in game.player_ids() {
        let Some(phrase) = active_phrase(directory, speaker) else {
            continue;
        };
        for listener in game.player_ids() {
            let holds = directory
                .player(listener)
                .unwrap()
                .buttons()
                .iter()
                .any(|b| b.phrase == phrase);
            if holds {
                return (speaker.clone(), listener.clone(), phrase);
            }
        }
    }
    panic!("no correct guess available");
}

#[test]
fn test_two_players_mirror_each_other() {
    let (game, directory, players) = create_started_game(4, 2, 7);
    let p1 = directory.player(&players[0].id).unwrap();
    let p2 = directory.player(&players[1].id).unwrap();

    let mut all: Vec<String> = phrase_texts(p1.phrases()).into_iter().collect();
    all.extend(phrase_texts(p2.phrases()));
    all.sort();
    assert_eq!(
        all,
        vec!["Test phrase 1", "Test phrase 2", "Test phrase 3", "Test phrase 4"]
    );

    assert_eq!(phrase_texts(p1.buttons()), phrase_texts(p2.phrases()));
    assert_eq!(phrase_texts(p2.buttons()), phrase_texts(p1.phrases()));
    assert_eq!(game.phase(), RoundPhase::RoundActive);
}

#[test]
fn test_every_phrase_dealt_exactly_once() {
    for num_players in 2..=6 {
        for seed in 0..5 {
            let (_game, directory, players) = create_started_game(17, num_players, seed);

            let mut spoken = Vec::new();
            let mut heard = Vec::new();
            for player in &players {
                let p = directory.player(&player.id).unwrap();
                spoken.extend(phrase_texts(p.phrases()));
                heard.extend(phrase_texts(p.buttons()));
            }
            spoken.sort();
            heard.sort();

            let unique: HashSet<&String> = spoken.iter().collect();
            assert_eq!(spoken.len(), 17);
            assert_eq!(unique.len(), 17);
            assert_eq!(spoken, heard);
        }
    }
}

#[test]
fn test_nobody_listens_for_their_own_phrase() {
    for num_players in 2..=5 {
        let (_game, directory, players) = create_started_game(23, num_players, 42);
        for player in &players {
            let p = directory.player(&player.id).unwrap();
            let own: HashSet<String> = phrase_texts(p.phrases()).into_iter().collect();
            for button in p.buttons() {
                assert!(!own.contains(&button.phrase));
            }
        }
    }
}

#[test]
fn test_round_start_messages() {
    let (mut game, mut directory, mut players) = create_test_game(create_test_catalog(4), 2);
    game.generate_round_with(&mut directory, &mut seeded_rng(1))
        .unwrap();

    for player in &mut players {
        let messages = player.drain();
        assert_eq!(messages.len(), 5);
        assert!(matches!(messages[0], ServerMessage::UpdatePhrase { phrase: Some(_) }));
        assert!(matches!(messages[1], ServerMessage::UpdateButtons { .. }));
        assert_eq!(messages[2], ServerMessage::StartGame);
        assert_eq!(messages[3], ServerMessage::StartTimer { duration_ms: 10000 });
        assert_eq!(
            messages[4],
            ServerMessage::UpdateScore {
                score: Score::default()
            }
        );
    }
}

#[test]
fn test_not_enough_players() {
    for num_players in 0..2 {
        let (mut game, mut directory, _players) =
            create_test_game(create_test_catalog(4), num_players);
        let result = game.generate_round(&mut directory);

        assert!(matches!(
            result,
            Err(GameError::NotEnoughPlayers {
                required: 2,
                present
            }) if present == num_players
        ));
        assert!(!game.is_started());
        assert!(game.pending_deadline().is_none());
    }
}

#[test]
fn test_incorrect_guess() {
    let (mut game, mut directory, mut players) = create_started_game(8, 3, 3);
    let guesser = players[0].id.clone();
    let queues_before: Vec<Vec<String>> = players
        .iter()
        .map(|p| phrase_texts(directory.player(&p.id).unwrap().phrases()))
        .collect();
    let first = game.pending_deadline().unwrap();

    let outcome = game
        .handle_click_phrase_at(&mut directory, "Not a real phrase", &guesser, Instant::now())
        .unwrap();

    assert_eq!(outcome, GuessOutcome::Incorrect);
    assert_eq!(game.score().num_incorrect, 1);
    assert_eq!(game.score().num_correct, 0);
    assert_eq!(directory.player(&guesser).unwrap().stats().incorrect_clicks, 1);

    let queues_after: Vec<Vec<String>> = players
        .iter()
        .map(|p| phrase_texts(directory.player(&p.id).unwrap().phrases()))
        .collect();
    assert_eq!(queues_before, queues_after);

    // Deadline moves earlier by the extra penalty, measured from the same start
    let second = game.pending_deadline().unwrap();
    assert_ne!(first.token, second.token);
    let penalty = ScoringEngine::max_time(Score::default())
        - ScoringEngine::max_time(Score {
            num_correct: 0,
            num_incorrect: 1,
        });
    assert_eq!(second.due + penalty, first.due);

    // Only the score goes out; the visible countdown is not restarted
    for player in &mut players {
        assert_eq!(
            player.drain(),
            vec![ServerMessage::UpdateScore {
                score: Score {
                    num_correct: 0,
                    num_incorrect: 1
                }
            }]
        );
    }
}

#[test]
fn test_incorrect_guess_after_time_is_up() {
    let (mut game, mut directory, players) = create_started_game(4, 2, 9);
    let late = game.pending_deadline().unwrap().due + Duration::from_secs(5);

    game.handle_click_phrase_at(&mut directory, "nope", &players[0].id, late)
        .unwrap();

    let deadline = game.pending_deadline().unwrap();
    assert_eq!(deadline.due, late);
    assert_eq!(deadline.remaining(late), Duration::ZERO);
}

#[test]
fn test_correct_guess() {
    let (mut game, mut directory, mut players) = create_started_game(12, 3, 11);
    let (speaker, listener, phrase) = find_correct_guess(&game, &directory);
    let speaker_queue = directory.player(&speaker).unwrap().phrases().len();
    let first = game.pending_deadline().unwrap();
    let now = Instant::now();

    let outcome = game
        .handle_click_phrase_at(&mut directory, &phrase, &listener, now)
        .unwrap();

    assert_eq!(
        outcome,
        GuessOutcome::Correct {
            speaker: speaker.clone()
        }
    );
    let s = directory.player(&speaker).unwrap();
    assert_eq!(s.phrases().len(), speaker_queue - 1);
    assert_ne!(s.active_phrase().map(|p| p.phrase.as_str()), Some(phrase.as_str()));
    assert_eq!(s.stats().others_clicked, 1);

    let g = directory.player(&listener).unwrap();
    assert!(g.buttons().iter().all(|b| b.phrase != phrase));
    assert_eq!(g.stats().correct_clicks, 1);

    assert_eq!(
        game.score(),
        Score {
            num_correct: 1,
            num_incorrect: 0
        }
    );

    // Fresh full countdown with the decayed maximum
    let second = game.pending_deadline().unwrap();
    assert_ne!(first.token, second.token);
    assert_eq!(second.due, now + Duration::from_millis(9550));

    for player in &mut players {
        let messages = player.drain();
        assert!(messages.contains(&ServerMessage::StartTimer { duration_ms: 9550 }));
        assert_eq!(
            messages.last(),
            Some(&ServerMessage::UpdateScore {
                score: Score {
                    num_correct: 1,
                    num_incorrect: 0
                }
            })
        );
    }
}

#[test]
fn test_same_phrase_twice_is_incorrect() {
    let (mut game, mut directory, _players) = create_started_game(12, 3, 5);
    let (_speaker, listener, phrase) = find_correct_guess(&game, &directory);

    game.handle_click_phrase(&mut directory, &phrase, &listener)
        .unwrap();
    let second = game
        .handle_click_phrase(&mut directory, &phrase, &listener)
        .unwrap();

    assert_eq!(second, GuessOutcome::Incorrect);
    assert_eq!(
        game.score(),
        Score {
            num_correct: 1,
            num_incorrect: 1
        }
    );
}

#[test]
fn test_answered_phrase_leaves_every_button_list() {
    let (mut game, mut directory, _players) = create_started_game(20, 4, 13);
    let (_speaker, listener, phrase) = find_correct_guess(&game, &directory);

    game.handle_click_phrase(&mut directory, &phrase, &listener)
        .unwrap();

    for id in game.player_ids() {
        let p = directory.player(id).unwrap();
        assert!(p.buttons().iter().all(|b| b.phrase != phrase));
    }
}

#[test]
fn test_unknown_player_guess() {
    let (mut game, mut directory, _players) = create_started_game(4, 2, 1);
    let result = game.handle_click_phrase(&mut directory, "Test phrase 1", "nobody");

    assert!(matches!(result, Err(GameError::UnknownPlayer { .. })));
    assert_eq!(game.score(), Score::default());
}

#[test]
fn test_guess_before_round() {
    let (mut game, mut directory, players) = create_test_game(create_test_catalog(4), 2);
    let result = game.handle_click_phrase(&mut directory, "Test phrase 1", &players[0].id);

    assert!(matches!(result, Err(GameError::RoundNotActive { .. })));
    assert_eq!(game.score(), Score::default());
}

#[test]
fn test_score_resets_and_only_grows_within_round() {
    let (mut game, mut directory, _players) = create_started_game(12, 3, 21);
    let mut previous = game.score();

    for i in 0..6 {
        let guesser = game.player_ids()[i % 3].clone();
        let phrase = if i % 2 == 0 {
            find_correct_guess(&game, &directory).2
        } else {
            "wrong".to_string()
        };
        game.handle_click_phrase(&mut directory, &phrase, &guesser)
            .unwrap();
        let score = game.score();
        assert!(score.num_correct >= previous.num_correct);
        assert!(score.num_incorrect >= previous.num_incorrect);
        previous = score;
    }
    assert_ne!(previous, Score::default());

    game.generate_round(&mut directory).unwrap();
    assert_eq!(game.score(), Score::default());
    for id in game.player_ids() {
        assert_eq!(
            directory.player(id).unwrap().stats(),
            PersonalStats::default()
        );
    }
}

#[test]
fn test_deadline_ends_round_with_personal_stats() {
    let (mut game, mut directory, mut players) = create_started_game(8, 2, 17);
    let (_speaker, listener, phrase) = find_correct_guess(&game, &directory);
    game.handle_click_phrase(&mut directory, &phrase, &listener)
        .unwrap();
    for player in &mut players {
        player.drain();
    }

    let deadline = game.pending_deadline().unwrap();
    assert!(game.fire_deadline(&directory, deadline.token));

    assert!(game.is_game_over());
    assert!(!game.is_started());
    assert_eq!(game.phase(), RoundPhase::RoundOver);
    assert!(game.pending_deadline().is_none());

    for player in &mut players {
        let stats = directory.player(&player.id).unwrap().stats();
        assert_eq!(player.drain(), vec![ServerMessage::GameOver { stats }]);
    }
    let listener_stats = directory.player(&listener).unwrap().stats();
    assert_eq!(listener_stats.correct_clicks, 1);
}

#[test]
fn test_superseded_deadline_is_ignored() {
    let (mut game, mut directory, players) = create_started_game(8, 2, 19);
    let stale = game.pending_deadline().unwrap();

    game.handle_click_phrase(&mut directory, "wrong", &players[0].id)
        .unwrap();

    assert!(!game.fire_deadline(&directory, stale.token));
    assert!(game.is_started());
    assert!(!game.is_game_over());
    assert!(game.pending_deadline().is_some());
}

#[test]
fn test_new_round_replaces_pending_deadline() {
    let (mut game, mut directory, _players) = create_started_game(8, 2, 23);
    let old = game.pending_deadline().unwrap();

    game.generate_round(&mut directory).unwrap();
    let new = game.pending_deadline().unwrap();

    assert_ne!(old.token, new.token);
    assert!(!game.fire_deadline(&directory, old.token));
    assert!(game.fire_deadline(&directory, new.token));
    assert!(game.pending_deadline().is_none());
}

#[test]
fn test_round_restarts_after_game_over() {
    let (mut game, mut directory, _players) = create_started_game(8, 2, 29);
    game.end_round(&directory);
    assert_eq!(game.phase(), RoundPhase::RoundOver);

    game.generate_round(&mut directory).unwrap();
    assert_eq!(game.phase(), RoundPhase::RoundActive);
    assert!(!game.is_game_over());
}

#[test]
fn test_departed_player_no_longer_guesses() {
    let (mut game, mut directory, players) = create_started_game(8, 3, 31);
    game.remove_player(&players[2].id);

    let result = game.handle_click_phrase(&mut directory, "wrong", &players[2].id);
    assert!(matches!(result, Err(GameError::UnknownPlayer { .. })));

    game.handle_click_phrase(&mut directory, "wrong", &players[0].id)
        .unwrap();
    assert_eq!(game.score().num_incorrect, 1);
}

#[test]
fn test_snapshot_reflects_round() {
    let (game, _directory, _players) = create_started_game(4, 2, 37);
    let snapshot = game.snapshot();

    assert_eq!(snapshot.id, "test");
    assert_eq!(snapshot.phase, RoundPhase::RoundActive);
    assert!(snapshot.started);
    assert_eq!(snapshot.player_count, 2);
    assert!(chrono::DateTime::parse_from_rfc3339(&snapshot.created_at).is_ok());
}
