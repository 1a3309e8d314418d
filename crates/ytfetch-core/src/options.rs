//! Run options and the on-disk config file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Media download mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    #[default]
    None,
    Video,
    Audio,
    Both,
}

impl DownloadMode {
    pub fn wants_video(self) -> bool {
        matches!(self, DownloadMode::Video | DownloadMode::Both)
    }

    pub fn wants_audio(self) -> bool {
        matches!(self, DownloadMode::Audio | DownloadMode::Both)
    }
}

/// What to do when media download is requested but ffmpeg is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FfmpegFallback {
    /// Fail the media stage.
    #[default]
    Error,
    /// Skip media download with a recorded warning.
    Skip,
}

/// Options for one fetch run. Created once per invocation, read-only after.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Output directory root; artifacts land under `<out>/<video_id>/`.
    pub out: PathBuf,
    /// Preferred transcript languages, in order.
    pub languages: Vec<String>,
    /// Accept auto-generated transcripts when no manual one matches.
    pub allow_generated: bool,
    /// Fall back to any available language when none of the preferred match.
    pub allow_any_language: bool,
    pub download: DownloadMode,
    /// Max video height (e.g. 720) when building the download format.
    pub max_height: Option<u32>,
    /// yt-dlp video format selector; "best" means auto-build from max_height.
    pub format: String,
    /// Audio container/codec; "best" means backend default (m4a).
    pub audio_format: String,
    /// Re-fetch everything, ignoring cached artifacts.
    pub force: bool,
    pub force_metadata: bool,
    pub force_transcript: bool,
    pub force_media: bool,
    /// Max retries per external call (0 = single attempt).
    pub retries: u32,
    /// Global request rate in requests per second, shared across workers.
    /// Zero (or negative) disables rate limiting.
    pub rate_limit: f64,
    /// Concurrent videos in a batch run.
    pub workers: usize,
    /// Stop dispatching new videos after the first failed one.
    pub fail_fast: bool,
    pub verbose: bool,
    pub ffmpeg_fallback: FfmpegFallback,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            out: PathBuf::from("./out"),
            languages: vec!["en".to_string()],
            allow_generated: true,
            allow_any_language: false,
            download: DownloadMode::None,
            max_height: None,
            format: "best".to_string(),
            audio_format: "best".to_string(),
            force: false,
            force_metadata: false,
            force_transcript: false,
            force_media: false,
            retries: 3,
            rate_limit: 2.0,
            workers: 3,
            fail_fast: false,
            verbose: false,
            ffmpeg_fallback: FfmpegFallback::Error,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ytfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load options from disk, creating a default file if none exists.
/// CLI flags are applied on top of the returned value by the caller.
pub fn load_or_init() -> Result<FetchOptions> {
    let path = config_path()?;
    if !path.exists() {
        let defaults = FetchOptions::default();
        let toml = toml::to_string_pretty(&defaults)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(defaults);
    }

    let data = fs::read_to_string(&path)?;
    let options: FetchOptions = toml::from_str(&data)?;
    Ok(options)
}
