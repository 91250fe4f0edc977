use std::time::{Duration, Instant};

/// Identifies one scheduled deadline. Tokens are never reused within a timer.
pub type DeadlineToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub token: DeadlineToken,
    pub due: Instant,
}

impl Deadline {
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }
}

/// Countdown bookkeeping for one game.
///
/// Holds at most one pending deadline. Scheduling always replaces the
/// previous deadline, and firing is only honoured for the current token,
/// so a deadline from a superseded countdown can never end a round.
#[derive(Debug)]
pub struct RoundTimer {
    started_at: Instant,
    pending: Option<Deadline>,
    next_token: DeadlineToken,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            pending: None,
            next_token: 1,
        }
    }

    /// Start the countdown over from `now`, due after `duration`.
    pub fn restart(&mut self, now: Instant, duration: Duration) -> Deadline {
        self.started_at = now;
        self.reschedule(now, duration)
    }

    /// Move the deadline to `remaining` from `now` without touching the start mark.
    pub fn reschedule(&mut self, now: Instant, remaining: Duration) -> Deadline {
        let deadline = Deadline {
            token: self.next_token,
            due: now + remaining,
        };
        self.next_token += 1;
        self.pending = Some(deadline);
        deadline
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn pending(&self) -> Option<Deadline> {
        self.pending
    }

    pub fn cancel(&mut self) -> Option<Deadline> {
        self.pending.take()
    }

    /// Consume the pending deadline if `token` is the current one.
    pub fn fire(&mut self, token: DeadlineToken) -> bool {
        match self.pending {
            Some(deadline) if deadline.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new()
    }
}
