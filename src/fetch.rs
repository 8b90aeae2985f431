//! Two-phase fetch execution
//!
//! Each locator is fetched in two phases: a HEAD request that only reads
//! headers (the metadata probe) and, if the resource passes admission and is
//! not already on disk, a GET request whose body is buffered whole.
//!
//! Transport failures are classified into closed outcome enums instead of
//! being raised and re-inspected: the worker pattern-matches on the variant
//! to pick the diagnostic kind, so "timeout vs. other" never depends on
//! error message text.

use crate::metadata::RemoteMetadata;
use std::time::Duration;

/// Result of the metadata probe phase.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// 200 response; carries the header snapshot
    Metadata(RemoteMetadata),
    /// Reachable, but the response status was not 200
    BadStatus(u16),
    /// The request exceeded the configured timeout
    TimedOut,
    /// Any other transport failure, with the underlying display text
    Failed(String),
}

/// Result of the body transfer phase.
#[derive(Debug)]
pub enum TransferOutcome {
    /// 200 response; carries the whole buffered body
    Body(Vec<u8>),
    /// Reachable, but the response status was not 200
    BadStatus(u16),
    /// The request exceeded the configured timeout
    TimedOut,
    /// Any other transport failure, with the underlying display text
    Failed(String),
}

/// HTTP fetch executor shared by all workers of a run.
///
/// Wraps one `reqwest::Client` built with the configured timeout; cloning
/// is cheap (the client is internally reference-counted).
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher whose probe and transfer requests both time out
    /// after `timeout`.
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Phase one: HEAD request reading only the response headers.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let response = match self.client.head(url).send().await {
            Ok(r) => r,
            Err(e) => {
                return match classify(&e) {
                    FailureClass::Timeout => ProbeOutcome::TimedOut,
                    FailureClass::Other(msg) => ProbeOutcome::Failed(msg),
                };
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            return ProbeOutcome::BadStatus(response.status().as_u16());
        }
        ProbeOutcome::Metadata(RemoteMetadata::from_headers(response.headers()))
    }

    /// Phase two: GET request buffering the whole body in memory.
    ///
    /// Bodies are bounded by the admission gate's maximum-size condition
    /// before this phase runs, so whole-body buffering is acceptable.
    pub async fn transfer(&self, url: &str) -> TransferOutcome {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                return match classify(&e) {
                    FailureClass::Timeout => TransferOutcome::TimedOut,
                    FailureClass::Other(msg) => TransferOutcome::Failed(msg),
                };
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            return TransferOutcome::BadStatus(response.status().as_u16());
        }

        // A body read can also time out mid-stream
        match response.bytes().await {
            Ok(body) => TransferOutcome::Body(body.to_vec()),
            Err(e) => match classify(&e) {
                FailureClass::Timeout => TransferOutcome::TimedOut,
                FailureClass::Other(msg) => TransferOutcome::Failed(msg),
            },
        }
    }
}

enum FailureClass {
    Timeout,
    Other(String),
}

fn classify(error: &reqwest::Error) -> FailureClass {
    if error.is_timeout() {
        FailureClass::Timeout
    } else {
        FailureClass::Other(error.to_string())
    }
}
