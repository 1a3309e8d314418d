//! Data model for fetched artifacts and batch results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Video metadata as returned by the metadata backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub video_id: String,
    pub source_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Upload date normalized to `YYYY-MM-DD`.
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    pub fetched_at: DateTime<Utc>,
    /// Which backend produced this record (e.g. "yt-dlp").
    pub metadata_source: String,
    /// Raw backend payload, kept for downstream consumers.
    #[serde(default)]
    pub raw: Option<serde_json::Value>,
}

/// One timed caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

/// A fetched transcript in one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    #[serde(default)]
    pub is_generated: Option<bool>,
    pub segments: Vec<TranscriptSegment>,
    pub fetched_at: DateTime<Utc>,
    pub transcript_source: String,
    #[serde(default)]
    pub available_languages: Vec<String>,
}

/// Result of the full pipeline for one video.
///
/// `success` reflects the metadata stage only: transcript and media failures
/// are recorded in `errors` but do not fail the video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub video_id: String,
    pub success: bool,
    #[serde(default)]
    pub metadata_path: Option<PathBuf>,
    #[serde(default)]
    pub transcript_path: Option<PathBuf>,
    #[serde(default)]
    pub media_paths: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transcript: Option<Transcript>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl FetchResult {
    /// A result for a video that could not be attempted at all.
    pub fn failed(video_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            success: false,
            metadata_path: None,
            transcript_path: None,
            media_paths: Vec::new(),
            metadata: None,
            transcript: None,
            errors: vec![error.into()],
        }
    }
}

/// Aggregate over a batch run. Videos skipped by fail-fast are not counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<FetchResult>,
}

impl BatchResult {
    /// Build from per-video results, deriving the counters.
    pub fn from_results(results: Vec<FetchResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}
