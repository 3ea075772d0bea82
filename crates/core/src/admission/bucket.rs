//! Single-device token bucket.

use std::time::Instant;

/// Continuous-refill token bucket.
///
/// `tokens` is fractional and never exceeds `capacity`; a call is admitted
/// when at least one whole token is available.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    rate: f64,
    capacity: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket refilling at `rate` tokens per second.
    pub fn new(rate: f64, burst: u32, now: Instant) -> Self {
        let capacity = f64::from(burst);
        Self {
            rate,
            capacity,
            tokens: capacity,
            last_refill: now,
        }
    }

    /// Refill for the time elapsed since the last call, then try to take one token.
    ///
    /// The refill instant advances on every call, admitted or not. A clock
    /// reading earlier than the last refill counts as zero elapsed time and
    /// does not move the refill instant backwards.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        if self.rate > 0.0 && elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        }
        self.last_refill = self.last_refill.max(now);
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Tokens currently held, without refilling.
    pub fn tokens(&self) -> f64 {
        self.tokens
    }
}
