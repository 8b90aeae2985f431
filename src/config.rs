//! Configuration types for image-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Input source configuration (where the URL list comes from)
///
/// Groups settings related to locating and tokenizing the input file.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Working root directory; relative input/output paths are resolved
    /// against it (default: current directory)
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Path to the URL list file, absolute or root-relative
    /// (None = run fails with an input-path diagnostic)
    #[serde(default)]
    pub input_path: Option<PathBuf>,

    /// Token separator used when splitting the input file (default: a single
    /// space; surrounding newlines and other whitespace are tolerated)
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            input_path: None,
            separator: default_separator(),
        }
    }
}

/// Download behavior configuration (target directory, batching, timeouts)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Download directory, absolute or root-relative. Must already exist
    /// when set explicitly; when None, `{root}/downloads` is used and
    /// created on demand.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// Number of URLs processed concurrently per batch (default: 5)
    ///
    /// Batches run strictly one after another; this is the concurrency
    /// ceiling for the whole run.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Timeout applied to each metadata probe and body transfer
    /// (default: 30 seconds)
    #[serde(default = "default_fetch_timeout", with = "duration_secs")]
    pub fetch_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            batch_size: default_batch_size(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

/// Admission limits applied to remote metadata before a body transfer
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Upper bound on declared content length, exclusive (default: 20 MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Lower bound on declared content length, exclusive (default: 10 bytes)
    #[serde(default = "default_min_file_size")]
    pub min_file_size: u64,

    /// Free-space safety margin that must remain on the download volume
    /// after the transfer, in bytes (default: 1 MB)
    #[serde(default = "default_min_free_space")]
    pub min_free_space: u64,

    /// Admissible content types, as full MIME strings (default: the common
    /// image types, e.g. `image/jpeg`)
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            min_file_size: default_min_file_size(),
            min_free_space: default_min_free_space(),
            allowed_types: default_allowed_types(),
        }
    }
}

/// Main configuration for [`ImageDownloader`](crate::ImageDownloader)
///
/// Fields are organized into logical sub-configs:
/// - [`source`](SourceConfig) — input file location and tokenizing
/// - [`download`](DownloadConfig) — target directory, batching, timeouts
/// - [`limits`](LimitsConfig) — metadata admission thresholds
///
/// All sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays flat with no nesting.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input source settings
    #[serde(flatten)]
    pub source: SourceConfig,

    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// Metadata admission limits
    #[serde(flatten)]
    pub limits: LimitsConfig,
}

fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_separator() -> String {
    " ".to_string()
}

fn default_batch_size() -> usize {
    5
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_file_size() -> u64 {
    20_000_000
}

fn default_min_file_size() -> u64 {
    10
}

fn default_min_free_space() -> u64 {
    1_000_000
}

fn default_allowed_types() -> Vec<String> {
    [
        "image/jpeg",
        "image/tiff",
        "image/x-icon",
        "image/bmp",
        "image/webp",
        "image/svg+xml",
        "image/png",
        "image/gif",
        "image/avif",
        "image/apng",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Serialize/deserialize `Duration` as whole seconds for flat config files.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
