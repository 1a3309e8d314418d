//! Fetch error taxonomy and retryability classification.

use thiserror::Error;

/// Error surfaced by a fetch backend.
///
/// Transient network-level failures are retryable; definitive answers from
/// the remote side (not found, disabled, unusable payload) are not.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("video unavailable: {0}")]
    NotFound(String),

    #[error("transcripts are disabled for {0}")]
    TranscriptsDisabled(String),

    #[error("no transcript for {video_id} in languages {wanted:?}; available: {available:?}")]
    TranscriptNotFound {
        video_id: String,
        wanted: Vec<String>,
        available: Vec<String>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("{tool} exited with {status}: {stderr}")]
    Tool {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("unusable response: {0}")]
    Parse(String),

    #[error("ffmpeg is required for media download but was not found; install ffmpeg or set ffmpeg_fallback = \"skip\"")]
    FfmpegMissing,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether the retry loop should re-attempt after this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout(_) => true,
            FetchError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }
}
