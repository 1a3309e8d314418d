//! One fetch stage for one video: cache probe, rate-limited retried call,
//! persistence, outcome.

use crate::cache;
use crate::fetch::{FetchError, MediaFetch, VideoFetcher};
use crate::models::{Metadata, Transcript};
use crate::options::FetchOptions;
use crate::rate_limit::TokenBucket;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::writer;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Outcome of one stage execution. Exactly one variant per run.
#[derive(Debug, Clone)]
pub enum StageOutcome<T> {
    /// Fresh fetch, persisted at `path`.
    Fetched { artifact: T, path: PathBuf },
    /// Cache hit; `artifact` is present when the cached file deserialized.
    Cached { artifact: Option<T>, path: PathBuf },
    /// Stage-local failure; the message carries the stage prefix.
    Failed(String),
}

impl<T> StageOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            StageOutcome::Fetched { path, .. } | StageOutcome::Cached { path, .. } => {
                Some(path.as_path())
            }
            StageOutcome::Failed(_) => None,
        }
    }

    /// Owned artifact, if the stage produced one.
    pub fn into_artifact(self) -> Option<T> {
        match self {
            StageOutcome::Fetched { artifact, .. } => Some(artifact),
            StageOutcome::Cached { artifact, .. } => artifact,
            StageOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StageOutcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Shared state for the stages of one video.
pub(crate) struct StageContext<'a> {
    pub fetcher: &'a dyn VideoFetcher,
    pub options: &'a FetchOptions,
    pub limiter: Option<&'a TokenBucket>,
    pub policy: RetryPolicy,
}

impl StageContext<'_> {
    async fn throttle(&self) {
        if let Some(limiter) = self.limiter {
            limiter.acquire_one().await;
        }
    }
}

/// Metadata stage. `Err` means an environment fault (disk), not a fetch
/// failure; fetch failures come back as `StageOutcome::Failed`.
pub(crate) async fn run_metadata_stage(
    ctx: &StageContext<'_>,
    video_id: &str,
) -> Result<StageOutcome<Metadata>> {
    let options = ctx.options;
    let path = writer::metadata_path(&options.out, video_id);

    if !cache::should_fetch(&path, options.force_metadata, options.force) {
        if let Some(cached) = writer::read_metadata(&options.out, video_id) {
            tracing::debug!("skipping metadata for {} (cached)", video_id);
            return Ok(StageOutcome::Cached {
                artifact: Some(cached),
                path,
            });
        }
        // Unreadable cache downgrades to a fetch.
    }

    ctx.throttle().await;
    let fetched = run_with_retry(&ctx.policy, FetchError::is_retryable, || {
        ctx.fetcher.metadata(video_id, options)
    })
    .await;

    match fetched {
        Ok(metadata) => {
            let path = writer::write_metadata(&metadata, &options.out)?;
            tracing::info!("wrote metadata for {}", video_id);
            Ok(StageOutcome::Fetched {
                artifact: metadata,
                path,
            })
        }
        Err(e) => {
            tracing::error!("metadata error for {}: {}", video_id, e);
            Ok(StageOutcome::Failed(format!("metadata: {}", e)))
        }
    }
}

/// Transcript stage; persists the JSON plus txt/vtt/srt renditions.
pub(crate) async fn run_transcript_stage(
    ctx: &StageContext<'_>,
    video_id: &str,
) -> Result<StageOutcome<Transcript>> {
    let options = ctx.options;
    let path = writer::transcript_path(&options.out, video_id);

    if !cache::should_fetch(&path, options.force_transcript, options.force) {
        if let Some(cached) = writer::read_transcript(&options.out, video_id) {
            tracing::debug!("skipping transcript for {} (cached)", video_id);
            return Ok(StageOutcome::Cached {
                artifact: Some(cached),
                path,
            });
        }
    }

    ctx.throttle().await;
    let fetched = run_with_retry(&ctx.policy, FetchError::is_retryable, || {
        ctx.fetcher.transcript(video_id, options)
    })
    .await;

    match fetched {
        Ok(transcript) => {
            let path = writer::write_transcript(&transcript, &options.out)?;
            tracing::info!("wrote transcript for {}", video_id);
            Ok(StageOutcome::Fetched {
                artifact: transcript,
                path,
            })
        }
        Err(e) => {
            tracing::error!("transcript error for {}: {}", video_id, e);
            Ok(StageOutcome::Failed(format!("transcript: {}", e)))
        }
    }
}

/// Media stage. The cached artifact is the media directory listing; the
/// backend persists files itself, so there is no separate write step.
pub(crate) async fn run_media_stage(
    ctx: &StageContext<'_>,
    video_id: &str,
) -> Result<StageOutcome<MediaFetch>> {
    let options = ctx.options;
    let media_dir = writer::media_dir(&options.out, video_id);

    if !cache::should_fetch_media(&media_dir, options.force_media, options.force) {
        tracing::debug!("skipping media for {} (cached)", video_id);
        let listing = MediaFetch {
            paths: cache::list_media_files(&media_dir),
            skipped: true,
            errors: Vec::new(),
        };
        return Ok(StageOutcome::Cached {
            artifact: Some(listing),
            path: media_dir,
        });
    }

    ctx.throttle().await;
    let fetched = run_with_retry(&ctx.policy, FetchError::is_retryable, || {
        ctx.fetcher.media(video_id, options, &media_dir)
    })
    .await;

    match fetched {
        Ok(media) => {
            if !media.skipped {
                tracing::info!("downloaded media for {}", video_id);
            }
            Ok(StageOutcome::Fetched {
                artifact: media,
                path: media_dir,
            })
        }
        Err(e) => {
            tracing::error!("media error for {}: {}", video_id, e);
            Ok(StageOutcome::Failed(format!("media: {}", e)))
        }
    }
}
