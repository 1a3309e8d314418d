//! Batch scheduler: bounded worker pool with fail-fast cancellation.
//!
//! Keeps up to `options.workers` videos in flight; when fail-fast trips,
//! videos not yet dispatched are skipped and excluded from the totals.
//! A video already in flight when the flag is set runs to completion.

use super::unit::process_video;
use crate::fetch::VideoFetcher;
use crate::models::{BatchResult, FetchResult};
use crate::options::FetchOptions;
use crate::rate_limit::TokenBucket;
use crate::writer;
use anyhow::{Context, Result};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Process a batch of videos concurrently, sharing one token bucket across
/// all workers. One video's failure never prevents others from being
/// attempted unless `fail_fast` is set. Writes `summary.json` under the
/// output root and logs a human-readable summary.
pub async fn process_batch(
    video_ids: &[String],
    options: &FetchOptions,
    fetcher: Arc<dyn VideoFetcher>,
) -> Result<BatchResult> {
    let options = Arc::new(options.clone());
    let limiter = Arc::new(TokenBucket::new(options.rate_limit));
    let workers = options.workers.max(1);
    let cancelled = Arc::new(AtomicBool::new(false));

    let mut queue: VecDeque<String> = video_ids.iter().cloned().collect();
    let mut join_set = JoinSet::new();
    let mut in_flight: HashMap<tokio::task::Id, String> = HashMap::new();
    let mut results: Vec<FetchResult> = Vec::new();

    loop {
        while join_set.len() < workers && !cancelled.load(Ordering::SeqCst) {
            let Some(video_id) = queue.pop_front() else {
                break;
            };
            let options = Arc::clone(&options);
            let fetcher = Arc::clone(&fetcher);
            let limiter = Arc::clone(&limiter);
            let id_for_task = video_id.clone();
            let handle = join_set.spawn(async move {
                match process_video(
                    &id_for_task,
                    &options,
                    fetcher.as_ref(),
                    Some(&limiter),
                )
                .await
                {
                    Ok(result) => result,
                    // Environment fault: fail this video, keep the batch alive.
                    Err(e) => {
                        tracing::error!("fatal error for {}: {:#}", id_for_task, e);
                        FetchResult::failed(&id_for_task, format!("fatal: {:#}", e))
                    }
                }
            });
            in_flight.insert(handle.id(), video_id);
        }

        if join_set.is_empty() {
            break;
        }

        let Some(joined) = join_set.join_next_with_id().await else {
            break;
        };
        match joined {
            Ok((task_id, result)) => {
                in_flight.remove(&task_id);
                if !result.success && options.fail_fast {
                    cancelled.store(true, Ordering::SeqCst);
                }
                results.push(result);
            }
            Err(e) => {
                let video_id = in_flight
                    .remove(&e.id())
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::error!("worker for {} panicked: {}", video_id, e);
                if options.fail_fast {
                    cancelled.store(true, Ordering::SeqCst);
                }
                results.push(FetchResult::failed(&video_id, format!("fatal: {}", e)));
            }
        }
    }

    let skipped = queue.len();
    if skipped > 0 {
        tracing::warn!("fail-fast: skipped {} queued video(s)", skipped);
    }

    let batch = BatchResult::from_results(results);
    tokio::fs::create_dir_all(&options.out)
        .await
        .with_context(|| format!("create output directory {}", options.out.display()))?;
    writer::write_summary(&batch, &options.out)?;
    log_summary(&batch, &options.out);
    Ok(batch)
}

/// Human-readable batch summary: totals, per-stage counts, artifact counts.
fn log_summary(batch: &BatchResult, out_dir: &Path) {
    let transcript_ok = batch
        .results
        .iter()
        .filter(|r| r.transcript_path.is_some())
        .count();
    let transcript_failed = batch
        .results
        .iter()
        .filter(|r| r.errors.iter().any(|e| e.contains("transcript")))
        .count();
    let media_files: usize = batch.results.iter().map(|r| r.media_paths.len()).sum();

    tracing::info!("========================================");
    tracing::info!("  ytfetch summary");
    tracing::info!("  total:       {}", batch.total);
    tracing::info!("  succeeded:   {}", batch.succeeded);
    tracing::info!("  failed:      {}", batch.failed);
    tracing::info!(
        "  transcripts: {} ok, {} failed",
        transcript_ok,
        transcript_failed
    );
    tracing::info!("  media files: {}", media_files);
    tracing::info!("  output:      {}", out_dir.display());
    tracing::info!("========================================");
}
