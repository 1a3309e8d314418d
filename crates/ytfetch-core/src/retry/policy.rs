use rand::Rng;
use std::time::Duration;

/// Exponential backoff with jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt (0 = no retries).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Delay multiplier per retry (2.0 = double each time).
    pub multiplier: f64,
    /// Jitter as a fraction of the delay (0.25 = ±25%).
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// Default schedule with the retry count taken from run options.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Backoff before retrying after failed attempt `attempt` (0-indexed):
    /// `base * multiplier^attempt`, perturbed by ±jitter, floored at zero.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let jittered = if self.jitter > 0.0 {
            let range = delay * self.jitter;
            delay + rand::rng().random_range(-range..=range)
        } else {
            delay
        };
        Duration::from_secs_f64(jittered.max(0.0))
    }
}
