//! Run-level result types

use std::path::PathBuf;

/// Outcome of one [`ImageDownloader::run`](crate::ImageDownloader::run)
/// invocation.
///
/// A run "succeeds" even when individual URLs fail — per-item failures are
/// collected as rendered diagnostic strings rather than raised. Only path
/// resolution can end a run early, in which case the corresponding resolved
/// path is `None` and `diagnostics` holds exactly one entry.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Resolved absolute input file path, when resolution succeeded
    pub resolved_input_path: Option<PathBuf>,

    /// Resolved download directory, when resolution succeeded
    pub resolved_output_dir: Option<PathBuf>,

    /// Rendered diagnostics in append order. Within a batch the order
    /// depends on worker completion order and is not deterministic.
    pub diagnostics: Vec<String>,
}

impl RunResult {
    /// True when every URL in the run was fetched (or skipped as already
    /// present) without recording a diagnostic.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
