//! Remote metadata snapshot taken during the probe phase

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, HeaderMap};

/// Headers of interest from a metadata probe response.
///
/// All fields are kept as the raw header text; absence of any of them makes
/// the metadata malformed, which the admission gate reports as its first
/// condition. `content_length` is deliberately a string — parsing happens
/// lazily and tolerantly in [`content_length_bytes`](Self::content_length_bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMetadata {
    /// Declared media type, e.g. `image/png`
    pub content_type: Option<String>,
    /// Declared body size as header text
    pub content_length: Option<String>,
    /// Content fingerprint (ETag-style), used for dedup and naming
    pub etag: Option<String>,
}

impl RemoteMetadata {
    /// Extract the fields of interest from a probe response's headers.
    /// Headers with non-UTF-8 values are treated as absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            content_type: text(CONTENT_TYPE),
            content_length: text(CONTENT_LENGTH),
            etag: text(ETAG),
        }
    }

    /// True when all three headers were present.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.content_type.is_some() && self.content_length.is_some() && self.etag.is_some()
    }

    /// Declared size in bytes. Non-numeric or missing header text counts as
    /// zero — a bad declaration must never abort the pipeline, it just runs
    /// into the minimum-size condition instead.
    #[must_use]
    pub fn content_length_bytes(&self) -> u64 {
        self.content_length
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }
}
