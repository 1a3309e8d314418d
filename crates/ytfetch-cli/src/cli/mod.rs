//! CLI for the ytfetch fetcher.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use ytfetch_core::options::{DownloadMode, FetchOptions, FfmpegFallback};

use commands::{run_completions, run_fetch, run_languages};

/// Top-level CLI for the ytfetch fetcher.
#[derive(Debug, Parser)]
#[command(name = "ytfetch", version)]
#[command(about = "Fetch YouTube metadata, transcripts, and media", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where the video IDs come from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Video ID or URL (repeatable).
    #[arg(long = "id", value_name = "ID_OR_URL")]
    pub ids: Vec<String>,

    /// File with IDs: plain text (one per line), .jsonl, or .csv.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Field/column holding the video ID in jsonl/csv input.
    #[arg(long, default_value = "id")]
    pub id_field: String,
}

/// Flags layered over the config-file options; unset flags keep the
/// configured (or default) value.
#[derive(Debug, Args)]
pub struct OptionArgs {
    /// Output directory.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Comma-separated transcript language codes, in preference order.
    #[arg(long, value_delimiter = ',', value_name = "LANGS")]
    pub languages: Option<Vec<String>>,

    /// Reject auto-generated transcripts.
    #[arg(long)]
    pub no_generated: bool,

    /// Fall back to any available transcript language.
    #[arg(long)]
    pub allow_any_language: bool,

    /// Media download mode: none, video, audio, or both.
    #[arg(long, value_parser = parse_download_mode, value_name = "MODE")]
    pub download: Option<DownloadMode>,

    /// Max video height (e.g. 720).
    #[arg(long, value_name = "PIXELS")]
    pub max_height: Option<u32>,

    /// yt-dlp video format selector.
    #[arg(long, value_name = "FMT")]
    pub format: Option<String>,

    /// Audio container/codec for audio downloads.
    #[arg(long, value_name = "FMT")]
    pub audio_format: Option<String>,

    /// Skip media download instead of failing when ffmpeg is missing.
    #[arg(long)]
    pub skip_without_ffmpeg: bool,

    /// Re-fetch everything, ignoring cached artifacts.
    #[arg(long)]
    pub force: bool,

    /// Re-fetch metadata only.
    #[arg(long)]
    pub force_metadata: bool,

    /// Re-fetch transcripts only.
    #[arg(long)]
    pub force_transcript: bool,

    /// Re-download media only.
    #[arg(long)]
    pub force_media: bool,

    /// Max retries per external call.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Global request rate in requests per second.
    #[arg(long, value_name = "RPS")]
    pub rate_limit: Option<f64>,

    /// Concurrent videos in a batch run.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Stop dispatching new videos after the first failure.
    #[arg(long)]
    pub fail_fast: bool,

    /// Verbose logging.
    #[arg(long, short)]
    pub verbose: bool,
}

impl OptionArgs {
    /// Apply explicitly-set flags on top of the configured options.
    pub fn apply(&self, mut options: FetchOptions) -> FetchOptions {
        if let Some(out) = &self.out {
            options.out = out.clone();
        }
        if let Some(languages) = &self.languages {
            options.languages = languages.clone();
        }
        if self.no_generated {
            options.allow_generated = false;
        }
        if self.allow_any_language {
            options.allow_any_language = true;
        }
        if let Some(download) = self.download {
            options.download = download;
        }
        if let Some(max_height) = self.max_height {
            options.max_height = Some(max_height);
        }
        if let Some(format) = &self.format {
            options.format = format.clone();
        }
        if let Some(audio_format) = &self.audio_format {
            options.audio_format = audio_format.clone();
        }
        if self.skip_without_ffmpeg {
            options.ffmpeg_fallback = FfmpegFallback::Skip;
        }
        options.force |= self.force;
        options.force_metadata |= self.force_metadata;
        options.force_transcript |= self.force_transcript;
        options.force_media |= self.force_media;
        if let Some(retries) = self.retries {
            options.retries = retries;
        }
        if let Some(rate_limit) = self.rate_limit {
            options.rate_limit = rate_limit;
        }
        if let Some(workers) = self.workers {
            options.workers = workers;
        }
        options.fail_fast |= self.fail_fast;
        options.verbose |= self.verbose;
        options
    }
}

fn parse_download_mode(value: &str) -> Result<DownloadMode, String> {
    match value {
        "none" => Ok(DownloadMode::None),
        "video" => Ok(DownloadMode::Video),
        "audio" => Ok(DownloadMode::Audio),
        "both" => Ok(DownloadMode::Both),
        other => Err(format!(
            "invalid download mode '{}' (expected none, video, audio, or both)",
            other
        )),
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch metadata, transcripts, and optionally media for a set of videos.
    Fetch {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        options: OptionArgs,
    },

    /// List the transcript languages a video offers.
    Languages {
        /// Video ID or URL.
        id: String,
    },

    /// Generate shell completions to stdout.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        match &self.command {
            CliCommand::Fetch { options, .. } => options.verbose,
            _ => false,
        }
    }

    /// Dispatch the parsed command; returns the process exit code.
    pub async fn run(self) -> Result<i32> {
        match self.command {
            CliCommand::Fetch { input, options } => run_fetch(input, options).await,
            CliCommand::Languages { id } => run_languages(&id).await,
            CliCommand::Completions { shell } => {
                run_completions(shell);
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests;
