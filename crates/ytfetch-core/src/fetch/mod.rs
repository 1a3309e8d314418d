//! Fetch backends: the trait seam the pipeline calls through, the error
//! taxonomy, and the yt-dlp implementation.

mod error;
mod ytdlp;

pub use error::FetchError;
pub use ytdlp::{TranscriptTrack, YtDlpFetcher};

use crate::models::{Metadata, Transcript};
use crate::options::FetchOptions;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Outcome of a media download. `skipped` with a recorded warning covers the
/// ffmpeg-missing fallback; partial errors do not fail the whole stage.
#[derive(Debug, Clone, Default)]
pub struct MediaFetch {
    pub paths: Vec<PathBuf>,
    pub skipped: bool,
    pub errors: Vec<String>,
}

/// The three fetch operations the pipeline orchestrates. Implementations own
/// all network/process I/O; the engine only decides whether and when to call.
#[async_trait]
pub trait VideoFetcher: Send + Sync {
    async fn metadata(
        &self,
        video_id: &str,
        options: &FetchOptions,
    ) -> Result<Metadata, FetchError>;

    async fn transcript(
        &self,
        video_id: &str,
        options: &FetchOptions,
    ) -> Result<Transcript, FetchError>;

    /// Download media into `media_dir` per the configured mode.
    async fn media(
        &self,
        video_id: &str,
        options: &FetchOptions,
        media_dir: &Path,
    ) -> Result<MediaFetch, FetchError>;
}

pub(crate) fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
