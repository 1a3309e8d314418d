//! Retry and backoff policy.
//!
//! Encapsulates the exponential-backoff-with-jitter schedule and the retry
//! loop so the pipeline stages share a consistent policy. What counts as
//! retryable is the caller's decision (see `FetchError::is_retryable`).

mod policy;
mod run;

pub use policy::RetryPolicy;
pub use run::run_with_retry;
