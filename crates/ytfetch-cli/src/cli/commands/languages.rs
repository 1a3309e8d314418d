//! `ytfetch languages` – list the transcript tracks a video offers.

use anyhow::{Context, Result};
use ytfetch_core::fetch::YtDlpFetcher;
use ytfetch_core::id_parser;

pub async fn run_languages(input: &str) -> Result<i32> {
    let video_id = id_parser::parse_video_id(input)
        .with_context(|| format!("invalid video ID or URL: {}", input))?;

    let fetcher = YtDlpFetcher::new();
    let tracks = fetcher.list_transcripts(&video_id).await?;
    if tracks.is_empty() {
        println!("no transcripts available for {}", video_id);
        return Ok(1);
    }

    for track in tracks {
        let kind = if track.is_generated {
            "generated"
        } else {
            "manual"
        };
        println!("{}\t{}", track.language, kind);
    }
    Ok(0)
}
