//! Retry loop: run an async operation until success or the policy says stop.

use super::policy::RetryPolicy;
use std::fmt::Display;
use std::future::Future;

/// Runs `op` up to `max_retries + 1` times, sleeping per the policy between
/// attempts. An error for which `retryable` returns false propagates
/// unchanged on first occurrence; when retries are exhausted the last error
/// propagates. The operation must be safe to repeat; no rollback is done.
pub async fn run_with_retry<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    retryable: P,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !retryable(&err) || attempt >= policy.max_retries {
                    if attempt > 0 {
                        tracing::error!(
                            "retry exhausted after {} attempts: {}",
                            attempt + 1,
                            err
                        );
                    }
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "retry {}/{} after {:.2}s: {}",
                    attempt + 1,
                    policy.max_retries,
                    delay.as_secs_f64(),
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
