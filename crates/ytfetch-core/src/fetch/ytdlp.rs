//! Fetch backend shelling out to `yt-dlp`.
//!
//! Metadata comes from a `-J` info dump; transcripts from json3 subtitle
//! downloads; media from a regular format-selected download. All process
//! I/O goes through tokio so pipeline workers stay suspendable.

use super::error::FetchError;
use super::{watch_url, MediaFetch, VideoFetcher};
use crate::models::{Metadata, Transcript, TranscriptSegment};
use crate::options::{FetchOptions, FfmpegFallback};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

/// Backend invoking the `yt-dlp` binary.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: String,
}

/// One transcript track as advertised by the info dump.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TranscriptTrack {
    pub language: String,
    pub is_generated: bool,
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpFetcher {
    pub fn new() -> Self {
        Self {
            program: "yt-dlp".to_string(),
        }
    }

    /// Override the binary name/path (tests, vendored installs).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, video_id: &str, args: &[&str]) -> Result<Output, FetchError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(FetchError::Io)?;
        if output.status.success() {
            return Ok(output);
        }
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Err(classify_failure(video_id, output.status, &stderr))
    }

    /// List the transcript tracks a video offers, manual tracks first.
    pub async fn list_transcripts(
        &self,
        video_id: &str,
    ) -> Result<Vec<TranscriptTrack>, FetchError> {
        let info = self.info_dump(video_id).await?;
        let manual = subtitle_languages(&info, "subtitles");
        let generated = subtitle_languages(&info, "automatic_captions");

        let mut tracks: Vec<TranscriptTrack> = manual
            .iter()
            .map(|lang| TranscriptTrack {
                language: lang.clone(),
                is_generated: false,
            })
            .collect();
        for lang in generated {
            if !manual.contains(&lang) {
                tracks.push(TranscriptTrack {
                    language: lang,
                    is_generated: true,
                });
            }
        }
        Ok(tracks)
    }

    /// Full `-J` info dump for a video.
    async fn info_dump(&self, video_id: &str) -> Result<Value, FetchError> {
        let url = watch_url(video_id);
        let output = self
            .run(
                video_id,
                &["-J", "--no-warnings", "--skip-download", "--no-color", &url],
            )
            .await?;
        serde_json::from_slice(&output.stdout)
            .map_err(|e| FetchError::Parse(format!("yt-dlp info dump for {}: {}", video_id, e)))
    }
}

#[async_trait]
impl VideoFetcher for YtDlpFetcher {
    async fn metadata(
        &self,
        video_id: &str,
        _options: &FetchOptions,
    ) -> Result<Metadata, FetchError> {
        let info = self.info_dump(video_id).await?;
        Ok(map_info(video_id, info))
    }

    async fn transcript(
        &self,
        video_id: &str,
        options: &FetchOptions,
    ) -> Result<Transcript, FetchError> {
        let info = self.info_dump(video_id).await?;
        let manual = subtitle_languages(&info, "subtitles");
        let generated = subtitle_languages(&info, "automatic_captions");

        if manual.is_empty() && generated.is_empty() {
            return Err(FetchError::TranscriptsDisabled(video_id.to_string()));
        }

        let mut available = manual.clone();
        for lang in &generated {
            if !available.contains(lang) {
                available.push(lang.clone());
            }
        }

        let Some((lang, is_generated)) = select_language(
            &manual,
            &generated,
            &options.languages,
            options.allow_generated,
            options.allow_any_language,
        ) else {
            return Err(FetchError::TranscriptNotFound {
                video_id: video_id.to_string(),
                wanted: options.languages.clone(),
                available,
            });
        };

        let tmp = tempfile::tempdir().map_err(FetchError::Io)?;
        let template = tmp.path().join("%(id)s");
        let template = template.to_string_lossy().into_owned();
        let subs_flag = if is_generated {
            "--write-auto-subs"
        } else {
            "--write-subs"
        };
        let url = watch_url(video_id);
        self.run(
            video_id,
            &[
                "--skip-download",
                "--no-warnings",
                "--no-color",
                subs_flag,
                "--sub-langs",
                &lang,
                "--sub-format",
                "json3",
                "-o",
                &template,
                &url,
            ],
        )
        .await?;

        let sub_path = tmp.path().join(format!("{}.{}.json3", video_id, lang));
        let data = tokio::fs::read(&sub_path).await.map_err(|_| {
            FetchError::Parse(format!(
                "yt-dlp wrote no json3 subtitle for {} ({})",
                video_id, lang
            ))
        })?;
        let json3: Value = serde_json::from_slice(&data)
            .map_err(|e| FetchError::Parse(format!("json3 for {}: {}", video_id, e)))?;

        let mut transcript = parse_json3(video_id, &lang, is_generated, &json3)?;
        transcript.available_languages = available;
        Ok(transcript)
    }

    async fn media(
        &self,
        video_id: &str,
        options: &FetchOptions,
        media_dir: &Path,
    ) -> Result<MediaFetch, FetchError> {
        if which::which("ffmpeg").is_err() {
            match options.ffmpeg_fallback {
                FfmpegFallback::Skip => {
                    tracing::warn!("ffmpeg not found, skipping media download for {}", video_id);
                    return Ok(MediaFetch {
                        skipped: true,
                        errors: vec!["ffmpeg not found, skipped media download".to_string()],
                        ..Default::default()
                    });
                }
                FfmpegFallback::Error => return Err(FetchError::FfmpegMissing),
            }
        }

        tokio::fs::create_dir_all(media_dir)
            .await
            .map_err(FetchError::Io)?;
        let url = watch_url(video_id);

        if options.download.wants_video() {
            let fmt = video_format(options);
            let template = media_dir.join(format!("{}.%(ext)s", video_id));
            let template = template.to_string_lossy().into_owned();
            self.run(
                video_id,
                &[
                    "-f",
                    &fmt,
                    "-o",
                    &template,
                    "--no-warnings",
                    "--no-color",
                    "--merge-output-format",
                    "mp4",
                    &url,
                ],
            )
            .await?;
        }

        if options.download.wants_audio() {
            let fmt = audio_format(options);
            let codec = if options.audio_format == "best" {
                "m4a"
            } else {
                options.audio_format.as_str()
            };
            let template = media_dir.join(format!("{}_audio.%(ext)s", video_id));
            let template = template.to_string_lossy().into_owned();
            self.run(
                video_id,
                &[
                    "-f",
                    &fmt,
                    "-o",
                    &template,
                    "--no-warnings",
                    "--no-color",
                    "--extract-audio",
                    "--audio-format",
                    codec,
                    &url,
                ],
            )
            .await?;
        }

        Ok(MediaFetch {
            paths: crate::cache::list_media_files(media_dir),
            skipped: false,
            errors: Vec::new(),
        })
    }
}

fn classify_failure(
    video_id: &str,
    status: std::process::ExitStatus,
    stderr: &str,
) -> FetchError {
    let lower = stderr.to_lowercase();
    if lower.contains("video unavailable")
        || lower.contains("private video")
        || lower.contains("this video is not available")
        || lower.contains("http error 404")
    {
        return FetchError::NotFound(video_id.to_string());
    }
    if lower.contains("timed out") || lower.contains("timeout") {
        return FetchError::Timeout(first_line(stderr));
    }
    if lower.contains("unable to download")
        || lower.contains("connection")
        || lower.contains("name resolution")
        || lower.contains("http error 429")
        || lower.contains("http error 5")
    {
        return FetchError::Network(first_line(stderr));
    }
    FetchError::Tool {
        tool: "yt-dlp",
        status: status.to_string(),
        stderr: first_line(stderr),
    }
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no output")
        .to_string()
}

/// Map a yt-dlp info dump into our metadata record.
fn map_info(video_id: &str, info: Value) -> Metadata {
    let str_field = |keys: &[&str]| -> Option<String> {
        keys.iter()
            .find_map(|k| info.get(*k).and_then(Value::as_str))
            .map(str::to_string)
    };

    let upload_date = str_field(&["upload_date"]).map(|raw| {
        // yt-dlp dates are YYYYMMDD; normalize to YYYY-MM-DD.
        if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
            format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8])
        } else {
            raw
        }
    });

    let tags = info
        .get("tags")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Metadata {
        video_id: video_id.to_string(),
        source_url: str_field(&["webpage_url"]).unwrap_or_else(|| watch_url(video_id)),
        title: str_field(&["title", "fulltitle"]),
        channel_title: str_field(&["channel", "uploader"]),
        channel_id: str_field(&["channel_id"]),
        upload_date,
        duration_seconds: info.get("duration").and_then(Value::as_f64),
        description: str_field(&["description"]),
        tags,
        view_count: info.get("view_count").and_then(Value::as_u64),
        like_count: info.get("like_count").and_then(Value::as_u64),
        fetched_at: Utc::now(),
        metadata_source: "yt-dlp".to_string(),
        raw: Some(info),
    }
}

fn subtitle_languages(info: &Value, key: &str) -> Vec<String> {
    info.get(key)
        .and_then(Value::as_object)
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default()
}

/// Pick a subtitle language. Priority: manual in preferred order, generated
/// in preferred order (if allowed), then any manual / any generated when
/// falling back to arbitrary languages is allowed.
fn select_language(
    manual: &[String],
    generated: &[String],
    preferred: &[String],
    allow_generated: bool,
    allow_any_language: bool,
) -> Option<(String, bool)> {
    for lang in preferred {
        if manual.contains(lang) {
            return Some((lang.clone(), false));
        }
        if allow_generated && generated.contains(lang) {
            return Some((lang.clone(), true));
        }
    }
    if allow_any_language {
        if let Some(lang) = manual.first() {
            return Some((lang.clone(), false));
        }
        if allow_generated {
            if let Some(lang) = generated.first() {
                return Some((lang.clone(), true));
            }
        }
    }
    None
}

/// Parse a json3 subtitle payload into a transcript.
fn parse_json3(
    video_id: &str,
    language: &str,
    is_generated: bool,
    json3: &Value,
) -> Result<Transcript, FetchError> {
    let events = json3
        .get("events")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Parse(format!("json3 for {}: missing events", video_id)))?;

    let mut segments = Vec::new();
    for event in events {
        let Some(segs) = event.get("segs").and_then(Value::as_array) else {
            continue;
        };
        let text: String = segs
            .iter()
            .filter_map(|s| s.get("utf8").and_then(Value::as_str))
            .collect();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let start_ms = event.get("tStartMs").and_then(Value::as_f64).unwrap_or(0.0);
        let duration_ms = event
            .get("dDurationMs")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        segments.push(TranscriptSegment {
            start: start_ms / 1000.0,
            duration: duration_ms / 1000.0,
            text: text.to_string(),
        });
    }

    Ok(Transcript {
        video_id: video_id.to_string(),
        language: language.to_string(),
        is_generated: Some(is_generated),
        segments,
        fetched_at: Utc::now(),
        transcript_source: "yt-dlp".to_string(),
        available_languages: Vec::new(),
    })
}

fn video_format(options: &FetchOptions) -> String {
    if options.format != "best" {
        return options.format.clone();
    }
    match options.max_height {
        Some(h) => format!(
            "bestvideo[height<={h}]+bestaudio/best[height<={h}]",
            h = h
        ),
        None => "bestvideo+bestaudio/best".to_string(),
    }
}

fn audio_format(options: &FetchOptions) -> String {
    if options.audio_format != "best" {
        format!("bestaudio[ext={}]/bestaudio", options.audio_format)
    } else {
        "bestaudio/best".to_string()
    }
}
