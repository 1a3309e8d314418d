//! Full pipeline for a single video.

use super::stage::{
    run_media_stage, run_metadata_stage, run_transcript_stage, StageContext,
};
use crate::fetch::VideoFetcher;
use crate::models::FetchResult;
use crate::options::{DownloadMode, FetchOptions};
use crate::rate_limit::TokenBucket;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};

/// Run the fetch pipeline for one video: metadata, transcript, then media
/// (when a download mode is configured), in that order. Stages run even when
/// an earlier one failed; only the metadata stage decides `success`.
///
/// Returns `Err` only for environment faults (e.g. the output directory
/// cannot be created); expected fetch failures land in `FetchResult.errors`.
pub async fn process_video(
    video_id: &str,
    options: &FetchOptions,
    fetcher: &dyn VideoFetcher,
    limiter: Option<&TokenBucket>,
) -> Result<FetchResult> {
    let video_dir = options.out.join(video_id);
    tokio::fs::create_dir_all(&video_dir)
        .await
        .with_context(|| format!("create output directory {}", video_dir.display()))?;

    let ctx = StageContext {
        fetcher,
        options,
        limiter,
        policy: RetryPolicy::with_max_retries(options.retries),
    };

    let mut errors = Vec::new();

    let metadata_outcome = run_metadata_stage(&ctx, video_id).await?;
    let success = !metadata_outcome.is_failed();
    if let Some(msg) = metadata_outcome.error() {
        errors.push(msg.to_string());
    }
    let metadata_path = metadata_outcome.path().map(Into::into);
    let metadata = metadata_outcome.into_artifact();

    let transcript_outcome = run_transcript_stage(&ctx, video_id).await?;
    if let Some(msg) = transcript_outcome.error() {
        errors.push(msg.to_string());
    }
    let transcript_path = transcript_outcome.path().map(Into::into);
    let transcript = transcript_outcome.into_artifact();

    let mut media_paths = Vec::new();
    if options.download != DownloadMode::None {
        let media_outcome = run_media_stage(&ctx, video_id).await?;
        if let Some(msg) = media_outcome.error() {
            errors.push(msg.to_string());
        }
        if let Some(media) = media_outcome.into_artifact() {
            media_paths = media.paths;
            errors.extend(media.errors);
        }
    }

    Ok(FetchResult {
        video_id: video_id.to_string(),
        success,
        metadata_path,
        transcript_path,
        media_paths,
        metadata,
        transcript,
        errors,
    })
}
