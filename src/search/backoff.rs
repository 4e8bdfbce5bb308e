//! Linear backoff for `backon`: the n-th retry waits `n * base`.

use std::time::Duration;

use backon::BackoffBuilder;

/// Builder for [`LinearBackoff`]
#[derive(Debug, Clone, Copy)]
pub struct LinearBackoffBuilder {
    base: Duration,
    max_attempts: usize,
}

impl LinearBackoffBuilder {
    /// `max_attempts` counts the first call, so it yields `max_attempts - 1` delays
    pub fn new(base: Duration, max_attempts: usize) -> Self {
        Self { base, max_attempts }
    }
}

impl BackoffBuilder for LinearBackoffBuilder {
    type Backoff = LinearBackoff;

    fn build(self) -> Self::Backoff {
        LinearBackoff {
            base: self.base,
            retries_left: self.max_attempts.saturating_sub(1),
            attempt: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    retries_left: usize,
    attempt: u32,
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.retries_left == 0 {
            return None;
        }
        self.retries_left -= 1;
        self.attempt += 1;
        Some(self.base * self.attempt)
    }
}
