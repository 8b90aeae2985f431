//! Body persistence
//!
//! One artifact, one file, written in a single operation. There is no
//! temp-file/rename discipline and no partial-write recovery: a save either
//! fully succeeds or returns the I/O error, which the worker converts to a
//! diagnostic.

use std::io;
use std::path::Path;

/// Write a transferred body under the derived artifact name.
///
/// Overwrites unconditionally if a same-named file appeared between the
/// dedup pre-check and this write. Equal names imply equal fingerprints, so
/// the overwritten content is presumed identical.
pub async fn save(download_dir: &Path, artifact_name: &str, body: &[u8]) -> io::Result<()> {
    tokio::fs::write(download_dir.join(artifact_name), body).await
}
