//! Input and output path resolution
//!
//! Paths are tried root-relative first, then as given. An unresolvable
//! path is the single run-fatal condition in the pipeline: the run reports
//! one diagnostic and ends before any fetching starts.

use crate::error::Error;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Directory name used under the root when no download directory is
/// configured.
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

// Pattern is a compile-time constant, the unwrap cannot fire
#[allow(clippy::unwrap_used)]
static INPUT_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9\s_\\.\-():/])+\.(txt|csv)$").unwrap()
});

/// Resolve the input file path.
///
/// The path must be present, match the input grammar (a `.txt` or `.csv`
/// file), and exist — tried under `root` first, then as given.
pub fn resolve_input(root: &Path, path: Option<&Path>) -> crate::Result<PathBuf> {
    let path = path.ok_or(Error::InvalidInputPath(None))?;
    let grammar_ok = path
        .to_str()
        .is_some_and(|s| INPUT_PATH_PATTERN.is_match(s));
    if !grammar_ok {
        return Err(Error::InvalidInputPath(Some(path.to_path_buf())));
    }

    let rooted = root.join(path);
    if rooted.is_file() {
        return Ok(rooted);
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    Err(Error::InvalidInputPath(Some(path.to_path_buf())))
}

/// Resolve the download directory.
///
/// An explicitly configured directory must already exist (tried under
/// `root` first, then as given). With no configuration, `{root}/downloads`
/// is used and created if missing.
pub fn resolve_output(root: &Path, dir: Option<&Path>) -> crate::Result<PathBuf> {
    match dir {
        Some(dir) => {
            let rooted = root.join(dir);
            if rooted.is_dir() {
                Ok(rooted)
            } else if dir.is_dir() {
                Ok(dir.to_path_buf())
            } else {
                Err(Error::InvalidDownloadDir(Some(dir.to_path_buf())))
            }
        }
        None => {
            let default = root.join(DEFAULT_DOWNLOAD_DIR);
            if !default.is_dir() {
                std::fs::create_dir_all(&default)
                    .map_err(|_| Error::InvalidDownloadDir(Some(default.clone())))?;
            }
            Ok(default)
        }
    }
}
