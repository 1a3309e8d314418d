//! Pipeline tests over a scripted mock fetcher (split per area).

use crate::fetch::{FetchError, MediaFetch, VideoFetcher};
use crate::models::{Metadata, Transcript, TranscriptSegment};
use crate::options::FetchOptions;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

mod unit;

pub(super) fn sample_metadata(video_id: &str) -> Metadata {
    Metadata {
        video_id: video_id.to_string(),
        source_url: format!("https://www.youtube.com/watch?v={}", video_id),
        title: Some(format!("Video {}", video_id)),
        channel_title: None,
        channel_id: None,
        upload_date: None,
        duration_seconds: Some(10.0),
        description: None,
        tags: Vec::new(),
        view_count: None,
        like_count: None,
        fetched_at: Utc::now(),
        metadata_source: "mock".to_string(),
        raw: None,
    }
}

pub(super) fn sample_transcript(video_id: &str) -> Transcript {
    Transcript {
        video_id: video_id.to_string(),
        language: "en".to_string(),
        is_generated: Some(false),
        segments: vec![TranscriptSegment {
            start: 0.0,
            duration: 2.0,
            text: "Hello".to_string(),
        }],
        fetched_at: Utc::now(),
        transcript_source: "mock".to_string(),
        available_languages: vec!["en".to_string()],
    }
}

/// Scripted fetcher: succeeds except for the listed video IDs, and counts
/// every call per stage.
#[derive(Default)]
pub(super) struct MockFetcher {
    pub metadata_calls: AtomicUsize,
    pub transcript_calls: AtomicUsize,
    pub media_calls: AtomicUsize,
    pub fail_metadata: HashSet<String>,
    pub fail_transcript: HashSet<String>,
    pub fail_media: HashSet<String>,
    /// Fail each stage with a retryable error instead of NotFound.
    pub retryable_failures: bool,
}

impl MockFetcher {
    pub fn failing_metadata(ids: &[&str]) -> Self {
        Self {
            fail_metadata: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn fail_for(&self, set: &HashSet<String>, video_id: &str) -> Option<FetchError> {
        if !set.contains(video_id) {
            return None;
        }
        Some(if self.retryable_failures {
            FetchError::Network(format!("connection reset for {}", video_id))
        } else {
            FetchError::NotFound(video_id.to_string())
        })
    }
}

#[async_trait]
impl VideoFetcher for MockFetcher {
    async fn metadata(
        &self,
        video_id: &str,
        _options: &FetchOptions,
    ) -> Result<Metadata, FetchError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_for(&self.fail_metadata, video_id) {
            return Err(err);
        }
        Ok(sample_metadata(video_id))
    }

    async fn transcript(
        &self,
        video_id: &str,
        _options: &FetchOptions,
    ) -> Result<Transcript, FetchError> {
        self.transcript_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_for(&self.fail_transcript, video_id) {
            return Err(err);
        }
        Ok(sample_transcript(video_id))
    }

    async fn media(
        &self,
        video_id: &str,
        _options: &FetchOptions,
        media_dir: &Path,
    ) -> Result<MediaFetch, FetchError> {
        self.media_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_for(&self.fail_media, video_id) {
            return Err(err);
        }
        std::fs::create_dir_all(media_dir).map_err(FetchError::Io)?;
        let path = media_dir.join(format!("{}.mp4", video_id));
        std::fs::write(&path, b"media").map_err(FetchError::Io)?;
        Ok(MediaFetch {
            paths: vec![path],
            skipped: false,
            errors: Vec::new(),
        })
    }
}

pub(super) fn test_options(out: &Path) -> FetchOptions {
    FetchOptions {
        out: out.to_path_buf(),
        // Retries would make call-count assertions ambiguous.
        retries: 0,
        ..FetchOptions::default()
    }
}
