//! Error types for image-dl
//!
//! Two layers of errors exist in the pipeline:
//! - [`Error`] — run-level failures. Only the path-resolution variants abort
//!   a run; everything else is either an infrastructure fault surfaced to
//!   the embedding application or converted to a diagnostic at the worker
//!   boundary.
//! - [`AdmissionError`] — the closed set of reasons the metadata gate can
//!   reject a resource. Variants are ordered exactly like the gate's
//!   condition chain; only the first failing condition is ever reported.
//!
//! Transport-level classification (bad status vs. timeout vs. other) is not
//! an error at all — see the outcome enums in [`crate::fetch`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for image-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for image-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Input file path missing, malformed, or not found on disk.
    /// This is a run-fatal condition: no fetches are attempted.
    #[error("invalid input file path: {0:?}")]
    InvalidInputPath(Option<PathBuf>),

    /// Explicit download directory does not exist, or the default one could
    /// not be created. Also run-fatal.
    #[error("invalid download directory: {0:?}")]
    InvalidDownloadDir(Option<PathBuf>),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Reasons the admission gate rejects a resource's metadata
///
/// Declaration order matches the gate's evaluation order: the header-shape
/// check runs first, the free-space check last. A rejection names only the
/// first condition that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// `content-type`, `content-length` or the content fingerprint header
    /// is missing from the probe response
    #[error("response headers are malformed")]
    HeadersMalformed,

    /// Declared content type is not on the image whitelist
    #[error("content type is not an admissible image type")]
    ContentTypeRejected,

    /// Declared content length reaches the configured maximum
    #[error("declared size exceeds the maximum")]
    TooLarge,

    /// Declared content length does not exceed the configured minimum
    #[error("declared size is below the minimum")]
    TooSmall,

    /// Transferring the body would leave less than the configured free-space
    /// margin on the download volume
    #[error("insufficient disk space")]
    InsufficientSpace,
}
