//! Diagnostic sink and process log
//!
//! Every worker in a batch appends to the same sink, so the backing store
//! is a mutex-guarded list: appends never interleave within an entry and
//! never get lost. Entries are rendered strings, appended once and never
//! removed or correlated back to structured errors — the sink is
//! write-mostly and read once at end of run.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Concurrent append-only collector of rendered diagnostics.
///
/// Cheap to clone; all clones share one underlying list.
#[derive(Clone, Default)]
pub struct DiagnosticSink {
    entries: Arc<Mutex<Vec<String>>>,
}

impl DiagnosticSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one rendered diagnostic.
    pub fn push(&self, entry: String) {
        self.lock().push(entry);
    }

    /// Number of entries recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no diagnostic has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the entries in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A poisoned lock only means some worker panicked mid-append;
        // the list itself is still a valid Vec
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Trivial append-only run log.
///
/// The orchestrator flushes the sink here at end of run. Log-write failures
/// are reported by the caller via `tracing::warn!` and otherwise ignored —
/// the log is an audit convenience, not part of the pipeline contract.
#[derive(Clone)]
pub struct ProcessLog {
    path: PathBuf,
}

impl ProcessLog {
    /// Log file name used under the working root.
    pub const FILE_NAME: &'static str = "process.log";

    /// Create a log writer targeting `{root}/process.log`.
    #[must_use]
    pub fn under_root(root: &Path) -> Self {
        Self {
            path: root.join(Self::FILE_NAME),
        }
    }

    /// Append one row, creating the file on first use.
    pub fn append(&self, row: &str) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{row}")
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
