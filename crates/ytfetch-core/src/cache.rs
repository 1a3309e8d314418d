//! Cache probes: decide per stage whether an artifact must be (re)fetched.

use std::fs;
use std::path::{Path, PathBuf};

/// True when the stage must fetch: forced (globally or per stage) or the
/// artifact file does not exist yet.
pub fn should_fetch(artifact: &Path, force_stage: bool, force_all: bool) -> bool {
    force_all || force_stage || !artifact.exists()
}

/// Media variant: the cache is a directory of downloaded files, so an absent
/// or empty directory counts as a miss.
pub fn should_fetch_media(media_dir: &Path, force_stage: bool, force_all: bool) -> bool {
    if force_all || force_stage {
        return true;
    }
    !media_dir.is_dir() || dir_is_empty(media_dir)
}

fn dir_is_empty(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

/// List cached media files, sorted for stable output. Missing dir is empty.
pub fn list_media_files(media_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(media_dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}
