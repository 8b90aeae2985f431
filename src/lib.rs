//! # image-dl
//!
//! Concurrent admission-and-fetch pipeline for batch image downloads.
//!
//! Given a file of whitespace-delimited URLs, image-dl validates each one,
//! probes the remote resource's metadata, runs an ordered admission gate
//! (content-type whitelist, size bounds, free disk space), skips artifacts
//! that are already on disk, and persists accepted bodies — one file per
//! resource, named after the server-supplied content fingerprint.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Per-item failure isolation** - A bad URL never aborts the batch;
//!   failures become diagnostic entries collected per run
//! - **Bounded concurrency** - URLs are processed in fixed-size batches,
//!   each batch joined fully before the next starts
//! - **Explicit configuration** - No ambient globals; every threshold and
//!   path is carried by the [`Config`] handed to the pipeline
//!
//! ## Quick Start
//!
//! ```no_run
//! use image_dl::{Config, ImageDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         source: image_dl::config::SourceConfig {
//!             input_path: Some("urls.txt".into()),
//!             ..Default::default()
//!         },
//!         ..Default::default()
//!     };
//!
//!     let downloader = ImageDownloader::new(config)?;
//!     let result = downloader.run().await;
//!
//!     for diagnostic in &result.diagnostics {
//!         eprintln!("{diagnostic}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Metadata admission gate
pub mod admission;
/// Configuration types
pub mod config;
/// Diagnostic sink and process log
pub mod diagnostics;
/// Error types
pub mod error;
/// Two-phase fetch execution (metadata probe, body transfer)
pub mod fetch;
/// Diagnostic message rendering
pub mod messages;
/// Remote metadata snapshot
pub mod metadata;
/// Artifact naming and dedup pre-check
pub mod naming;
/// Input and output path resolution
pub mod paths;
/// Body persistence
pub mod persist;
/// Batch scheduling and run orchestration
pub mod pipeline;
/// Filesystem free-space probe
pub mod space;
/// Run-level result types
pub mod types;
/// Locator validation
pub mod validator;

// Re-export commonly used types
pub use config::{Config, DownloadConfig, LimitsConfig, SourceConfig};
pub use error::{AdmissionError, Error, Result};
pub use pipeline::ImageDownloader;
pub use types::RunResult;
