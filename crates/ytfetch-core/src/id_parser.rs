//! Video ID parsing: raw IDs, YouTube URLs, and ID list files.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

/// A valid video ID: exactly 11 characters of `[A-Za-z0-9_-]`.
fn is_valid_video_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Extract a video ID from a raw ID or a YouTube URL. None when unparseable.
pub fn parse_video_id(input: &str) -> Option<String> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }
    if is_valid_video_id(text) {
        return Some(text.to_string());
    }

    let parsed = Url::parse(text).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let candidate = match host {
        "youtube.com" | "m.youtube.com" => {
            let path = parsed.path();
            if path == "/watch" {
                parsed
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned())
            } else {
                ["/shorts/", "/embed/", "/v/"]
                    .iter()
                    .find_map(|prefix| path.strip_prefix(prefix))
                    .map(|rest| rest.split('/').next().unwrap_or("").to_string())
            }
        }
        "youtu.be" => parsed
            .path()
            .trim_start_matches('/')
            .split('/')
            .next()
            .map(str::to_string),
        _ => None,
    }?;

    is_valid_video_id(&candidate).then_some(candidate)
}

/// Parse many inputs, dropping unparseable ones and deduplicating while
/// preserving first-seen order.
pub fn parse_many(inputs: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in inputs {
        if let Some(id) = parse_video_id(raw) {
            if seen.insert(id.clone()) {
                out.push(id);
            }
        }
    }
    out
}

/// Load video IDs from a file: `.jsonl` (object per line, `id_field` key),
/// `.csv` (header column named `id_field`), or plain text (one ID/URL per
/// line, `#` comments skipped). Output is parsed and deduplicated.
pub fn load_ids_from_file(path: &Path, id_field: &str) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read id file {}", path.display()))?;
    let suffix = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let raw: Vec<String> = match suffix.as_str() {
        "jsonl" => data
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
            .filter_map(|obj| {
                obj.get(id_field).map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            })
            .collect(),
        "csv" => {
            let mut lines = data.lines().filter(|l| !l.trim().is_empty());
            let header = lines.next().unwrap_or("");
            let column = header
                .split(',')
                .position(|col| col.trim() == id_field)
                .with_context(|| {
                    format!("csv {} has no '{}' column", path.display(), id_field)
                })?;
            lines
                .filter_map(|line| line.split(',').nth(column))
                .map(|cell| cell.trim().to_string())
                .filter(|cell| !cell.is_empty())
                .collect()
        }
        _ => data
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect(),
    };

    Ok(parse_many(&raw))
}
