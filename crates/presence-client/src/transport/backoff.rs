//! Bounded exponential backoff with jitter.

use std::time::Duration;

use presence_config::ReconnectConfig;
use rand::Rng;

/// Delay schedule for consecutive failed connection attempts.
///
/// Retry `n` (zero-based) waits `min(max, initial * 2^n)`, shrunk by a
/// random fraction of at most `jitter`. After `max_attempts` retries the
/// schedule is exhausted.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial_ms: u64,
    max_ms: u64,
    max_attempts: u32,
    jitter: f64,
    attempt: u32,
}

impl Backoff {
    pub fn new(config: &ReconnectConfig) -> Self {
        Self {
            initial_ms: config.initial_delay_ms,
            max_ms: config.max_delay_ms.max(config.initial_delay_ms),
            max_attempts: config.max_attempts,
            jitter: config.jitter.clamp(0.0, 1.0),
            attempt: 0,
        }
    }

    /// Retries handed out since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Delay before the next retry, or `None` once retries are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let sample = rand::thread_rng().gen::<f64>();
        self.next_delay_with(sample)
    }

    /// `sample` is a uniform draw from `[0, 1)`.
    pub(crate) fn next_delay_with(&mut self, sample: f64) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        let base = self.base_delay_ms(self.attempt);
        self.attempt += 1;

        let scale = 1.0 - self.jitter * sample.clamp(0.0, 1.0);
        Some(Duration::from_millis((base as f64 * scale).round() as u64))
    }

    fn base_delay_ms(&self, attempt: u32) -> u64 {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        self.initial_ms.saturating_mul(factor).min(self.max_ms)
    }
}
