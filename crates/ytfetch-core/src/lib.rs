//! ytfetch core: fetch YouTube metadata, transcripts, and media for sets of
//! video IDs, with idempotent on-disk caching, a shared token-bucket rate
//! limit, retries, and a bounded-concurrency batch scheduler.

pub mod logging;
pub mod options;

pub mod cache;
pub mod fetch;
pub mod id_parser;
pub mod models;
pub mod pipeline;
pub mod rate_limit;
pub mod retry;
pub mod time_fmt;
pub mod writer;

use anyhow::Result;
use std::sync::Arc;

use fetch::YtDlpFetcher;
use models::{BatchResult, FetchResult};
use options::FetchOptions;
use rate_limit::TokenBucket;

/// Fetch metadata, transcript, and optionally media for a single video.
///
/// Accepts a raw video ID or any supported YouTube URL. An unparseable input
/// yields a failed `FetchResult`, not an error.
pub async fn fetch_video(input: &str, options: &FetchOptions) -> Result<FetchResult> {
    let Some(video_id) = id_parser::parse_video_id(input) else {
        return Ok(FetchResult::failed(
            input,
            format!("invalid video ID or URL: {}", input),
        ));
    };

    let fetcher = YtDlpFetcher::new();
    let limiter = TokenBucket::new(options.rate_limit);
    pipeline::process_video(&video_id, options, &fetcher, Some(&limiter)).await
}

/// Fetch a batch of videos concurrently. Inputs are parsed and deduplicated;
/// unparseable entries are dropped.
pub async fn fetch_batch(inputs: &[String], options: &FetchOptions) -> Result<BatchResult> {
    let video_ids = id_parser::parse_many(inputs);
    pipeline::process_batch(&video_ids, options, Arc::new(YtDlpFetcher::new())).await
}
