//! Dealing the phrase catalog out across a room.
//!
//! Every phrase is given to one player to say and to the next player in a
//! rotating order to listen for. The rotation order is reshuffled each time
//! it wraps, so pairings change over the course of a round.

use alarm_types::{PhraseRecord, PlayerId};
use rand::Rng;
use rand::seq::SliceRandom;

/// One dealt phrase: who says it, who listens for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub phrase: PhraseRecord,
    pub speaker: PlayerId,
    pub listener: PlayerId,
}

/// Deal every phrase in `phrases` across `player_ids`.
///
/// With a single player the speaker and listener are the same; callers
/// that care (the game does) must refuse to deal to fewer than two.
pub fn deal_phrases<R: Rng + ?Sized>(
    player_ids: &[PlayerId],
    phrases: &[PhraseRecord],
    rng: &mut R,
) -> Vec<Assignment> {
    let num_players = player_ids.len();
    if num_players == 0 {
        return Vec::new();
    }

    let mut order = player_ids.to_vec();
    let mut deck = phrases.to_vec();
    // Fisher-Yates, unbiased
    deck.shuffle(rng);

    let mut assignments = Vec::with_capacity(deck.len());
    let mut current = 0;
    for phrase in deck {
        if current == 0 {
            order.shuffle(rng);
        }
        let next = (current + 1) % num_players;
        assignments.push(Assignment {
            phrase,
            speaker: order[current].clone(),
            listener: order[next].clone(),
        });
        current = next;
    }

    assignments
}
