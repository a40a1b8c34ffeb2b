use std::time::{Duration, Instant};
use log::warn;

use crate::config::anti_spam::{BAN_DURATION_SECONDS, MAX_REQUESTS_PER_SECOND};

/// Tracks anti-flood state for a single player connection.
pub struct AntiSpamState {
    // Timestamp of last reset (for per-second counters)
    last_tick: Instant,
    // Number of requests received in the current second
    requests_this_tick: u32,
    // Ban state
    banned_until: Option<Instant>,
}

impl AntiSpamState {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            requests_this_tick: 0,
            banned_until: None,
        }
    }

    /// Call at the start of every incoming request (message).
    /// Returns true if the request must be dropped.
    pub fn record_request(&mut self, player: &str) -> bool {
        self.record_request_at(player, Instant::now())
    }

    fn record_request_at(&mut self, player: &str, now: Instant) -> bool {
        if self.is_banned_at(now) {
            return true;
        }
        self.tick(now);
        self.requests_this_tick += 1;
        if self.requests_this_tick > MAX_REQUESTS_PER_SECOND {
            self.ban(player, now);
            return true;
        }
        false
    }

    /// Returns true if the session is banned at `now`.
    fn is_banned_at(&self, now: Instant) -> bool {
        self.banned_until.is_some_and(|until| now < until)
    }

    /// Ban the session for BAN_DURATION_SECONDS.
    fn ban(&mut self, player: &str, now: Instant) {
        let until = now + Duration::from_secs(BAN_DURATION_SECONDS);
        self.banned_until = Some(until);
        warn!(
            "[AntiSpam] Banned player={} for {}s: too many requests per second",
            player, BAN_DURATION_SECONDS
        );
    }

    /// Reset per-second counters if a new second has started.
    fn tick(&mut self, now: Instant) {
        if now.duration_since(self.last_tick) >= Duration::from_secs(1) {
            self.last_tick = now;
            self.requests_this_tick = 0;
        }
    }
}

impl Default for AntiSpamState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bans_after_too_many_requests_in_one_second() {
        let mut state = AntiSpamState::new();
        let start = state.last_tick;
        for _ in 0..MAX_REQUESTS_PER_SECOND {
            assert!(!state.record_request_at("p", start));
        }
        assert!(state.record_request_at("p", start));
        assert!(state.is_banned_at(start + Duration::from_secs(1)));
        // Still dropped after the per-second window resets.
        assert!(state.record_request_at("p", start + Duration::from_secs(2)));
        assert!(!state.is_banned_at(start + Duration::from_secs(BAN_DURATION_SECONDS + 1)));
    }

    #[test]
    fn counter_resets_every_second() {
        let mut state = AntiSpamState::new();
        let start = state.last_tick;
        for second in 0..3 {
            let now = start + Duration::from_secs(second);
            for _ in 0..MAX_REQUESTS_PER_SECOND {
                assert!(!state.record_request_at("p", now));
            }
        }
        assert!(!state.is_banned_at(start + Duration::from_secs(3)));
    }
}
