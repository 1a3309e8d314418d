//! Per-video pipeline tests: stage isolation, caching, force flags.

use super::*;
use crate::options::DownloadMode;
use crate::pipeline::process_video;
use crate::writer;
use std::fs;

const VID: &str = "dQw4w9WgXcQ";

#[tokio::test]
async fn full_pipeline_success() {
    let dir = tempfile::tempdir().unwrap();
    let options = test_options(dir.path());
    let fetcher = MockFetcher::default();

    let result = process_video(VID, &options, &fetcher, None).await.unwrap();

    assert!(result.success);
    assert_eq!(result.video_id, VID);
    assert!(result.errors.is_empty());
    assert!(result.metadata_path.as_ref().unwrap().exists());
    assert!(result.transcript_path.as_ref().unwrap().exists());
    assert_eq!(fetcher.metadata_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.transcript_calls.load(Ordering::SeqCst), 1);
    // Download mode is none, so the media stage never ran.
    assert_eq!(fetcher.media_calls.load(Ordering::SeqCst), 0);
    assert!(dir.path().join(VID).is_dir());
}

#[tokio::test]
async fn metadata_failure_fails_video_but_not_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let options = test_options(dir.path());
    let fetcher = MockFetcher::failing_metadata(&[VID]);

    let result = process_video(VID, &options, &fetcher, None).await.unwrap();

    assert!(!result.success);
    assert!(result.metadata_path.is_none());
    assert!(result.transcript_path.is_some());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("metadata:"));
}

#[tokio::test]
async fn transcript_failure_keeps_video_successful() {
    let dir = tempfile::tempdir().unwrap();
    let options = test_options(dir.path());
    let fetcher = MockFetcher {
        fail_transcript: [VID.to_string()].into(),
        ..Default::default()
    };

    let result = process_video(VID, &options, &fetcher, None).await.unwrap();

    assert!(result.success);
    assert!(result.metadata_path.is_some());
    assert!(result.transcript_path.is_none());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("transcript:"));
}

#[tokio::test]
async fn media_failure_keeps_video_successful() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(dir.path());
    options.download = DownloadMode::Video;
    let fetcher = MockFetcher {
        fail_media: [VID.to_string()].into(),
        ..Default::default()
    };

    let result = process_video(VID, &options, &fetcher, None).await.unwrap();

    assert!(result.success);
    assert!(result.media_paths.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("media:"));
}

#[tokio::test]
async fn all_stages_fail_collects_prefixed_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(dir.path());
    options.download = DownloadMode::Video;
    let ids: std::collections::HashSet<String> = [VID.to_string()].into();
    let fetcher = MockFetcher {
        fail_metadata: ids.clone(),
        fail_transcript: ids.clone(),
        fail_media: ids,
        ..Default::default()
    };

    let result = process_video(VID, &options, &fetcher, None).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.errors.len(), 3);
    for (error, stage) in result.errors.iter().zip(["metadata", "transcript", "media"]) {
        assert!(error.starts_with(stage), "{} missing {} prefix", error, stage);
    }
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(dir.path());
    options.download = DownloadMode::Video;
    let fetcher = MockFetcher::default();

    let first = process_video(VID, &options, &fetcher, None).await.unwrap();
    assert!(first.success);
    assert_eq!(fetcher.metadata_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.transcript_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.media_calls.load(Ordering::SeqCst), 1);

    let second = process_video(VID, &options, &fetcher, None).await.unwrap();
    assert!(second.success);
    // No additional collaborator calls.
    assert_eq!(fetcher.metadata_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.transcript_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.media_calls.load(Ordering::SeqCst), 1);
    // Same artifact paths, with the cached values re-populated.
    assert_eq!(second.metadata_path, first.metadata_path);
    assert_eq!(second.transcript_path, first.transcript_path);
    assert_eq!(second.media_paths, first.media_paths);
    assert!(second.metadata.is_some());
    assert!(second.transcript.is_some());
}

#[tokio::test]
async fn malformed_cache_is_refetched() {
    let dir = tempfile::tempdir().unwrap();
    let options = test_options(dir.path());
    let fetcher = MockFetcher::default();

    let path = writer::metadata_path(dir.path(), VID);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ truncated").unwrap();

    let result = process_video(VID, &options, &fetcher, None).await.unwrap();

    assert!(result.success);
    assert_eq!(fetcher.metadata_calls.load(Ordering::SeqCst), 1);
    assert!(result.metadata.is_some());
    // The artifact was rewritten and is valid again.
    assert!(writer::read_metadata(dir.path(), VID).is_some());
}

#[tokio::test]
async fn force_refetches_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(dir.path());
    options.download = DownloadMode::Video;
    let fetcher = MockFetcher::default();

    process_video(VID, &options, &fetcher, None).await.unwrap();
    options.force = true;
    process_video(VID, &options, &fetcher, None).await.unwrap();

    assert_eq!(fetcher.metadata_calls.load(Ordering::SeqCst), 2);
    assert_eq!(fetcher.transcript_calls.load(Ordering::SeqCst), 2);
    assert_eq!(fetcher.media_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn force_metadata_only_refetches_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(dir.path());
    options.download = DownloadMode::Video;
    let fetcher = MockFetcher::default();

    process_video(VID, &options, &fetcher, None).await.unwrap();
    options.force_metadata = true;
    process_video(VID, &options, &fetcher, None).await.unwrap();

    assert_eq!(fetcher.metadata_calls.load(Ordering::SeqCst), 2);
    assert_eq!(fetcher.transcript_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.media_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn force_media_only_refetches_media() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(dir.path());
    options.download = DownloadMode::Video;
    let fetcher = MockFetcher::default();

    process_video(VID, &options, &fetcher, None).await.unwrap();
    options.force_media = true;
    process_video(VID, &options, &fetcher, None).await.unwrap();

    assert_eq!(fetcher.metadata_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.transcript_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.media_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cached_media_dir_is_listed_not_refetched() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(dir.path());
    options.download = DownloadMode::Video;
    let fetcher = MockFetcher::default();

    let media_dir = writer::media_dir(dir.path(), VID);
    fs::create_dir_all(&media_dir).unwrap();
    fs::write(media_dir.join("existing.mp4"), b"x").unwrap();

    let result = process_video(VID, &options, &fetcher, None).await.unwrap();

    assert_eq!(fetcher.media_calls.load(Ordering::SeqCst), 0);
    assert_eq!(result.media_paths.len(), 1);
    assert!(result.media_paths[0].ends_with("existing.mp4"));
}

#[tokio::test]
async fn retryable_failure_is_reattempted() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(dir.path());
    options.retries = 2;
    let fetcher = MockFetcher {
        fail_metadata: [VID.to_string()].into(),
        retryable_failures: true,
        ..Default::default()
    };

    tokio::time::pause();
    let result = process_video(VID, &options, &fetcher, None).await.unwrap();

    assert!(!result.success);
    // Initial attempt plus two retries.
    assert_eq!(fetcher.metadata_calls.load(Ordering::SeqCst), 3);
}
