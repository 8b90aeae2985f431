//! Batch scheduling and run orchestration
//!
//! [`ImageDownloader`] wires the pipeline together for one run: resolve
//! paths, read and tokenize the input file, validate and deduplicate the
//! locators, fan each batch out to concurrent workers, and aggregate
//! diagnostics into a [`RunResult`]. Per-locator failures are recovered at
//! the worker boundary; only path resolution can end a run early.

mod batching;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::admission::AdmissionGate;
use crate::config::Config;
use crate::diagnostics::{DiagnosticSink, ProcessLog};
use crate::fetch::{Fetcher, ProbeOutcome, TransferOutcome};
use crate::space::SpaceProbe;
use crate::types::RunResult;
use crate::{messages, naming, paths, persist, validator};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Batch download pipeline (cloneable - all fields are cheap to clone or
/// Arc-wrapped).
///
/// One instance runs one URL list at a time via [`run`](Self::run); the
/// instance itself is stateless between runs, so it can be reused or run
/// concurrently from multiple tasks with independent configs per instance.
#[derive(Clone)]
pub struct ImageDownloader {
    /// Configuration (wrapped in Arc for sharing across workers)
    config: Arc<Config>,
    /// HTTP fetch executor shared by all workers
    fetcher: Fetcher,
    /// Metadata admission gate
    gate: AdmissionGate,
    /// Append-only run log under the working root
    log: ProcessLog,
}

impl ImageDownloader {
    /// Create a pipeline with the platform free-space probe.
    pub fn new(config: Config) -> crate::Result<Self> {
        Self::with_space_probe(config, crate::space::default_probe())
    }

    /// Create a pipeline with an explicit free-space probe.
    ///
    /// Embedders that account for space themselves (and tests) inject a
    /// probe here; everyone else uses [`new`](Self::new).
    pub fn with_space_probe(config: Config, probe: SpaceProbe) -> crate::Result<Self> {
        let fetcher = Fetcher::new(config.download.fetch_timeout)?;
        let gate = AdmissionGate::new(config.limits.clone(), probe);
        let log = ProcessLog::under_root(&config.source.root);
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            gate,
            log,
        })
    }

    /// Execute one full run: read, validate, fetch in batches, report.
    ///
    /// Never returns an error — an unresolvable input or output path ends
    /// the run early with a single fatal diagnostic, and every other
    /// failure is recorded per locator while the run continues. A partially
    /// successful run is the expected common case.
    pub async fn run(&self) -> RunResult {
        let sink = DiagnosticSink::new();

        let input_path = match paths::resolve_input(
            &self.config.source.root,
            self.config.source.input_path.as_deref(),
        ) {
            Ok(path) => path,
            Err(_) => {
                sink.push(messages::invalid_input_path(
                    self.config.source.input_path.as_deref(),
                ));
                return self.finish(None, None, &sink);
            }
        };

        let download_dir = match paths::resolve_output(
            &self.config.source.root,
            self.config.download.download_dir.as_deref(),
        ) {
            Ok(dir) => dir,
            Err(_) => {
                sink.push(messages::invalid_download_dir(
                    self.config.download.download_dir.as_deref(),
                ));
                return self.finish(Some(input_path), None, &sink);
            }
        };

        let content = match tokio::fs::read_to_string(&input_path).await {
            Ok(content) => content,
            Err(_) => {
                // Resolved moments ago but unreadable now; same fatal path
                sink.push(messages::invalid_input_path(Some(&input_path)));
                return self.finish(Some(input_path), None, &sink);
            }
        };

        let tokens = tokenize(&content, &self.config.source.separator);
        let locators = collect_valid(tokens, &sink);

        tracing::info!(
            input = %input_path.display(),
            total = locators.len(),
            batch_size = self.config.download.batch_size,
            "Download run started"
        );

        self.execute_batches(locators, &download_dir, &sink).await;

        self.finish(Some(input_path), Some(download_dir), &sink)
    }

    /// Fan the validated, deduplicated locator set out in batches.
    async fn execute_batches(
        &self,
        locators: Vec<String>,
        download_dir: &Path,
        sink: &DiagnosticSink,
    ) {
        let this = self.clone();
        let download_dir = download_dir.to_path_buf();
        let sink = sink.clone();
        batching::run_batches(
            locators,
            self.config.download.batch_size,
            move |locator| {
                let this = this.clone();
                let download_dir = download_dir.clone();
                let sink = sink.clone();
                async move {
                    this.process_locator(&locator, &download_dir, &sink).await;
                }
            },
        )
        .await;
    }

    /// Per-locator worker: probe, admit, dedup-check, transfer, persist.
    ///
    /// Every failure terminates this worker only, as a diagnostic entry.
    /// An artifact already on disk is a silent no-op success.
    async fn process_locator(&self, url: &str, download_dir: &Path, sink: &DiagnosticSink) {
        tracing::info!(%url, "Download started");

        let meta = match self.fetcher.probe(url).await {
            ProbeOutcome::Metadata(meta) => meta,
            ProbeOutcome::BadStatus(status) => {
                tracing::debug!(%url, status, "Metadata probe refused");
                sink.push(messages::unavailable(url));
                return;
            }
            ProbeOutcome::TimedOut => {
                sink.push(messages::timed_out(url));
                return;
            }
            ProbeOutcome::Failed(detail) => {
                sink.push(messages::failure(url, &detail));
                return;
            }
        };

        if let Err(kind) = self.gate.admit(&meta, download_dir) {
            tracing::debug!(%url, reason = %kind, "Admission rejected");
            sink.push(messages::admission_failed(url, kind));
            return;
        }

        // Admission guarantees the content type is present
        let content_type = meta.content_type.as_deref().unwrap_or_default();
        let artifact = naming::artifact_name(meta.etag.as_deref(), content_type);
        if naming::artifact_exists(&artifact, download_dir) {
            tracing::info!(%url, %artifact, "Artifact already present, transfer skipped");
            return;
        }

        let body = match self.fetcher.transfer(url).await {
            TransferOutcome::Body(body) => body,
            TransferOutcome::BadStatus(status) => {
                tracing::debug!(%url, status, "Body transfer refused");
                sink.push(messages::unavailable(url));
                return;
            }
            TransferOutcome::TimedOut => {
                sink.push(messages::timed_out(url));
                return;
            }
            TransferOutcome::Failed(detail) => {
                sink.push(messages::failure(url, &detail));
                return;
            }
        };

        match persist::save(download_dir, &artifact, &body).await {
            Ok(()) => {
                tracing::info!(%url, %artifact, "Download completed successfully");
            }
            Err(e) => {
                // A persistence fault stays inside this worker; the batch
                // keeps running
                tracing::error!(%url, %artifact, error = %e, "Failed to persist artifact");
                sink.push(messages::failure(url, &e.to_string()));
            }
        }
    }

    /// Emit the end-of-run report and assemble the [`RunResult`].
    fn finish(
        &self,
        input_path: Option<PathBuf>,
        download_dir: Option<PathBuf>,
        sink: &DiagnosticSink,
    ) -> RunResult {
        let diagnostics = sink.snapshot();

        // Aggregate block only when more than one entry was recorded
        if diagnostics.len() > 1 {
            tracing::warn!(count = diagnostics.len(), errors = ?diagnostics, "Run recorded failures");
        }
        for row in &diagnostics {
            if let Err(e) = self.log.append(row) {
                tracing::warn!(log = %self.log.path().display(), error = %e, "Failed to append to run log");
                break;
            }
        }
        if let Some(dir) = &download_dir {
            tracing::info!(download_dir = %dir.display(), "Download run complete");
        }

        RunResult {
            resolved_input_path: input_path,
            resolved_output_dir: download_dir,
            diagnostics,
        }
    }
}

/// Split the input file on the configured separator, tolerating newlines
/// and other whitespace around tokens.
fn tokenize(content: &str, separator: &str) -> Vec<String> {
    content
        .split(separator)
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

/// Filter tokens through the URL grammar, recording a diagnostic per
/// invalid token, then deduplicate the survivors preserving order.
fn collect_valid(tokens: Vec<String>, sink: &DiagnosticSink) -> Vec<String> {
    let valid = tokens
        .into_iter()
        .filter(|token| {
            if validator::is_valid_locator(token) {
                true
            } else {
                sink.push(messages::invalid_locator(token));
                false
            }
        })
        .collect();
    validator::dedup_preserving_order(valid)
}
