//! Token bucket rate limiter shared across batch workers.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket limiting the global outbound request rate.
///
/// `rate` tokens are added per second, capped at `capacity` (defaults to
/// `rate`, i.e. at most one second of burst). State is mutex-protected so
/// concurrent workers never double-spend a token; the blocking path sleeps
/// outside the lock and re-checks on wake since other workers may have
/// drained the bucket meanwhile.
pub struct TokenBucket {
    rate: f64,
    capacity: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Bucket with capacity equal to the rate. A non-positive rate disables
    /// limiting: every acquire is granted immediately.
    pub fn new(rate: f64) -> Self {
        Self::with_capacity(rate, rate)
    }

    pub fn with_capacity(rate: f64, capacity: f64) -> Self {
        Self {
            rate,
            capacity,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Acquire `tokens` from the bucket.
    ///
    /// With `blocking` set, suspends the calling task until enough tokens
    /// have refilled and always returns true. Otherwise returns false
    /// immediately when the bucket cannot cover the request.
    pub async fn acquire(&self, tokens: f64, blocking: bool) -> bool {
        // Unlimited bucket; the deficit math below would divide by the rate.
        if self.rate <= 0.0 {
            return true;
        }
        loop {
            let wait = {
                let mut state = self.state.lock().expect("token bucket lock poisoned");
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
                state.last_refill = now;

                if state.tokens >= tokens {
                    state.tokens -= tokens;
                    return true;
                }
                if !blocking {
                    return false;
                }
                (tokens - state.tokens) / self.rate
            };
            tokio::time::sleep(Duration::from_secs_f64(wait)).await;
        }
    }

    /// Blocking acquire of a single token.
    pub async fn acquire_one(&self) -> bool {
        self.acquire(1.0, true).await
    }
}
