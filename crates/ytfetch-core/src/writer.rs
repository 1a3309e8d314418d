//! Artifact persistence: atomic JSON/text writes and cache readers.
//!
//! Every write goes to a temp file in the destination directory and is
//! renamed into place, so a crashed run never leaves a half-written artifact
//! that a later cache probe would trust.

use crate::models::{BatchResult, Metadata, Transcript};
use crate::time_fmt::{seconds_to_srt, seconds_to_vtt};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub fn metadata_path(out_dir: &Path, video_id: &str) -> PathBuf {
    out_dir.join(video_id).join("metadata.json")
}

pub fn transcript_path(out_dir: &Path, video_id: &str) -> PathBuf {
    out_dir.join(video_id).join("transcript.json")
}

pub fn media_dir(out_dir: &Path, video_id: &str) -> PathBuf {
    out_dir.join(video_id).join("media")
}

pub fn write_metadata(metadata: &Metadata, out_dir: &Path) -> Result<PathBuf> {
    let dest = metadata_path(out_dir, &metadata.video_id);
    atomic_write_json(&dest, metadata)?;
    Ok(dest)
}

/// Read cached metadata. Missing or malformed file is a cache miss, not an
/// error; malformed files are logged and refetched by the caller.
pub fn read_metadata(out_dir: &Path, video_id: &str) -> Option<Metadata> {
    read_json_artifact(&metadata_path(out_dir, video_id))
}

/// Write the transcript JSON plus the txt/vtt/srt renditions.
/// Returns the JSON path (the artifact the cache probe keys on).
pub fn write_transcript(transcript: &Transcript, out_dir: &Path) -> Result<PathBuf> {
    let video_dir = out_dir.join(&transcript.video_id);
    let dest = video_dir.join("transcript.json");
    atomic_write_json(&dest, transcript)?;
    atomic_write_text(&video_dir.join("transcript.txt"), &transcript_txt(transcript))?;
    atomic_write_text(&video_dir.join("transcript.vtt"), &transcript_vtt(transcript))?;
    atomic_write_text(&video_dir.join("transcript.srt"), &transcript_srt(transcript))?;
    Ok(dest)
}

pub fn read_transcript(out_dir: &Path, video_id: &str) -> Option<Transcript> {
    read_json_artifact(&transcript_path(out_dir, video_id))
}

pub fn write_summary(batch: &BatchResult, out_dir: &Path) -> Result<PathBuf> {
    let dest = out_dir.join("summary.json");
    atomic_write_json(&dest, batch)?;
    Ok(dest)
}

fn transcript_txt(transcript: &Transcript) -> String {
    let mut text = transcript
        .segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    text
}

fn transcript_vtt(transcript: &Transcript) -> String {
    let mut parts = vec!["WEBVTT".to_string(), String::new()];
    for seg in &transcript.segments {
        parts.push(format!(
            "{} --> {}",
            seconds_to_vtt(seg.start),
            seconds_to_vtt(seg.start + seg.duration)
        ));
        parts.push(seg.text.clone());
        parts.push(String::new());
    }
    parts.join("\n")
}

fn transcript_srt(transcript: &Transcript) -> String {
    let mut parts = Vec::new();
    for (i, seg) in transcript.segments.iter().enumerate() {
        parts.push((i + 1).to_string());
        parts.push(format!(
            "{} --> {}",
            seconds_to_srt(seg.start),
            seconds_to_srt(seg.start + seg.duration)
        ));
        parts.push(seg.text.clone());
        parts.push(String::new());
    }
    parts.join("\n")
}

fn atomic_write_json<T: Serialize>(dest: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize artifact for {}", dest.display()))?;
    json.push('\n');
    atomic_write_text(dest, &json)
}

fn atomic_write_text(dest: &Path, content: &str) -> Result<()> {
    let parent = dest
        .parent()
        .with_context(|| format!("no parent dir for {}", dest.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("create dir {}", parent.display()))?;
    let tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file in {}", parent.display()))?;
    fs::write(tmp.path(), content)
        .with_context(|| format!("write temp file for {}", dest.display()))?;
    tmp.persist(dest)
        .with_context(|| format!("rename into {}", dest.display()))?;
    Ok(())
}

fn read_json_artifact<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let data = fs::read(path).ok()?;
    match serde_json::from_slice(&data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("malformed cached artifact {}: {}", path.display(), e);
            None
        }
    }
}
