use alarm_types::Score;
use std::time::Duration;

/// Absolute floor of the round countdown.
pub const BASE_TIME_MS: u64 = 1000;
/// Extra time available on top of the floor before any decay.
pub const DECAY_WINDOW_MS: f64 = 9000.0;
/// Per-unit decay applied to the window.
pub const DECAY_FACTOR: f64 = 0.95;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Number of decay units the room has accumulated this round.
    /// A wrong tap costs twice what a right one does.
    pub fn decay_units(score: Score) -> u64 {
        u64::from(score.num_correct) + 2 * u64::from(score.num_incorrect)
    }

    /// Full countdown length for the given round score, in milliseconds.
    ///
    /// `BASE_TIME_MS + round(DECAY_WINDOW_MS * DECAY_FACTOR ^ units)`
    pub fn max_time_ms(score: Score) -> u64 {
        let units = Self::decay_units(score).min(i32::MAX as u64) as i32;
        let window = (DECAY_WINDOW_MS * DECAY_FACTOR.powi(units)).round();
        BASE_TIME_MS + window as u64
    }

    pub fn max_time(score: Score) -> Duration {
        Duration::from_millis(Self::max_time_ms(score))
    }
}
