//! Jittered inter-page delay.
//!
//! A fixed request cadence is an easy bot signal, so the crawl sleeps for a
//! uniformly random duration between page navigations. The policy is a value
//! so tests can swap in [`JitterPolicy::none`] without touching the loop.

use rand::Rng;
use std::time::Duration;

/// Uniform random delay in `[min, max)` applied between result pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterPolicy {
    min: Duration,
    max: Duration,
}

impl JitterPolicy {
    /// Delay uniformly distributed in `[min, max)`.
    ///
    /// `min > max` is treated as a fixed delay of `min`.
    pub fn uniform(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Zero delay, for deterministic tests.
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Draw one delay.
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        let millis = rand::rng().random_range(self.min.as_millis() as u64..self.max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

impl Default for JitterPolicy {
    /// 1-3 seconds between pages.
    fn default() -> Self {
        Self::uniform(Duration::from_millis(1000), Duration::from_millis(3000))
    }
}
