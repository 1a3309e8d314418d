//! Orchestration pipeline.
//!
//! Per-video stage sequence (metadata, then transcript, then media) with idempotent
//! caching, plus the bounded-concurrency batch scheduler with fail-fast
//! cancellation. Stages share one token-bucket limiter and a per-run retry
//! policy; stage failures stay local to their video.

mod batch;
mod stage;
mod unit;

pub use batch::process_batch;
pub use stage::StageOutcome;
pub use unit::process_video;

#[cfg(test)]
mod tests;
