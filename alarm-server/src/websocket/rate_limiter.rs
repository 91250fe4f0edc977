use std::time::{Duration, Instant};

/// Token bucket guarding one connection's inbound frames.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tokens: u32,
    max_tokens: u32,
    refill_rate: Duration,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::new_with_limits(30, Duration::from_secs(2))
    }

    /// `max_tokens` frames in a burst, one more every `refill_rate`.
    pub fn new_with_limits(max_tokens: u32, refill_rate: Duration) -> Self {
        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate,
            last_refill: Instant::now(),
        }
    }

    pub fn check_rate_limit(&mut self) -> bool {
        self.refill_tokens(Instant::now());

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill_tokens(&mut self, now: Instant) {
        if self.refill_rate.is_zero() {
            self.tokens = self.max_tokens;
            return;
        }

        let time_passed = now.saturating_duration_since(self.last_refill);
        let intervals = time_passed.as_nanos() / self.refill_rate.as_nanos();
        if intervals == 0 {
            return;
        }

        let intervals = u32::try_from(intervals).unwrap_or(u32::MAX);
        self.tokens = self.tokens.saturating_add(intervals).min(self.max_tokens);
        // Keep the partial interval so slow trickles still earn tokens
        self.last_refill = self
            .last_refill
            .checked_add(self.refill_rate.saturating_mul(intervals))
            .unwrap_or(now);
    }

    pub fn get_remaining_tokens(&mut self) -> u32 {
        self.refill_tokens(Instant::now());
        self.tokens
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
