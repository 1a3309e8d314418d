use super::*;
use std::path::PathBuf;
use ytfetch_core::options::{DownloadMode, FetchOptions, FfmpegFallback};

#[test]
fn fetch_with_repeated_ids() {
    let CliCommand::Fetch { input, .. } = parse(&[
        "ytfetch",
        "fetch",
        "--id",
        "dQw4w9WgXcQ",
        "--id",
        "https://youtu.be/aaaaaaaaaaa",
    ]) else {
        panic!("expected fetch");
    };
    assert_eq!(input.ids.len(), 2);
    assert!(input.file.is_none());
    assert_eq!(input.id_field, "id");
}

#[test]
fn fetch_with_file_and_id_field() {
    let CliCommand::Fetch { input, .. } = parse(&[
        "ytfetch",
        "fetch",
        "--file",
        "ids.jsonl",
        "--id-field",
        "video_id",
    ]) else {
        panic!("expected fetch");
    };
    assert_eq!(input.file, Some(PathBuf::from("ids.jsonl")));
    assert_eq!(input.id_field, "video_id");
}

#[test]
fn option_flags_override_configured_values() {
    let CliCommand::Fetch { options, .. } = parse(&[
        "ytfetch",
        "fetch",
        "--id",
        "dQw4w9WgXcQ",
        "--out",
        "/tmp/yt",
        "--languages",
        "de,en",
        "--download",
        "both",
        "--workers",
        "5",
        "--rate-limit",
        "0.5",
        "--retries",
        "1",
        "--fail-fast",
        "--force-transcript",
        "--no-generated",
        "--skip-without-ffmpeg",
    ]) else {
        panic!("expected fetch");
    };

    let resolved = options.apply(FetchOptions::default());
    assert_eq!(resolved.out, PathBuf::from("/tmp/yt"));
    assert_eq!(resolved.languages, vec!["de", "en"]);
    assert_eq!(resolved.download, DownloadMode::Both);
    assert_eq!(resolved.workers, 5);
    assert_eq!(resolved.rate_limit, 0.5);
    assert_eq!(resolved.retries, 1);
    assert!(resolved.fail_fast);
    assert!(resolved.force_transcript);
    assert!(!resolved.force);
    assert!(!resolved.allow_generated);
    assert_eq!(resolved.ffmpeg_fallback, FfmpegFallback::Skip);
}

#[test]
fn unset_flags_keep_configured_values() {
    let CliCommand::Fetch { options, .. } =
        parse(&["ytfetch", "fetch", "--id", "dQw4w9WgXcQ"])
    else {
        panic!("expected fetch");
    };

    let mut configured = FetchOptions::default();
    configured.workers = 7;
    configured.fail_fast = true;
    let resolved = options.apply(configured);
    assert_eq!(resolved.workers, 7);
    assert!(resolved.fail_fast);
    assert_eq!(resolved.retries, 3);
}

#[test]
fn invalid_download_mode_is_rejected() {
    let result = Cli::try_parse_from(["ytfetch", "fetch", "--download", "everything"]);
    assert!(result.is_err());
}
