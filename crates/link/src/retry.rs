//! Reconnect delay strategies.
//!
//! The session asks the policy for a delay after every close, passing the
//! number of closes since the transport was last open. Retry never gives up;
//! a policy only decides how long to wait.

use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Strategy for the delay before the next connection attempt
pub trait RetryPolicy: Send + fmt::Debug {
    /// Delay before reconnecting after the `consecutive_closes`-th close in a
    /// row (starts at 1)
    fn next_delay(&self, consecutive_closes: u32) -> Duration;
}

/// Same delay after every close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Fixed delay of `delay`
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl RetryPolicy for FixedDelay {
    fn next_delay(&self, _consecutive_closes: u32) -> Duration {
        self.delay
    }
}

/// Doubling delay, capped, with optional jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    /// Delay after the first close
    pub initial: Duration,
    /// Upper bound
    pub max: Duration,
    /// Draw uniformly from `[delay / 2, delay]` instead of using `delay`
    pub jitter: bool,
}

impl ExponentialBackoff {
    /// Backoff from `initial` up to `max`, without jitter
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            jitter: false,
        }
    }

    /// Enable jitter
    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    fn ceiling(&self, consecutive_closes: u32) -> Duration {
        let exponent = consecutive_closes.saturating_sub(1).min(31);
        self.initial
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.max)
            .min(self.max)
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn next_delay(&self, consecutive_closes: u32) -> Duration {
        let ceiling = self.ceiling(consecutive_closes);
        if !self.jitter {
            return ceiling;
        }
        let ceiling_ms = ceiling.as_millis() as u64;
        if ceiling_ms < 2 {
            return ceiling;
        }
        let ms = rand::thread_rng().gen_range(ceiling_ms / 2..=ceiling_ms);
        Duration::from_millis(ms)
    }
}
