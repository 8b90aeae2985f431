//! Diagnostic message rendering
//!
//! One rendering function per diagnostic kind. Purely cosmetic: these
//! strings are what lands in the diagnostic sink and the process log, and
//! nothing in the pipeline branches on their content. External consumers
//! may match on them, so the templates are stable.

use crate::error::AdmissionError;
use std::path::Path;

/// A candidate token failed the URL grammar.
#[must_use]
pub fn invalid_locator(url: &str) -> String {
    format!("URL {url} is invalid")
}

/// The input file path could not be resolved. Run-fatal.
#[must_use]
pub fn invalid_input_path(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("Input file path {} is invalid", p.display()),
        None => "Input file path is missing".to_string(),
    }
}

/// The download directory could not be resolved. Run-fatal.
#[must_use]
pub fn invalid_download_dir(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("Download path {} is invalid", p.display()),
        None => "Download path is invalid".to_string(),
    }
}

/// Non-200 response on the metadata probe or the body transfer.
#[must_use]
pub fn unavailable(url: &str) -> String {
    format!("Unable to load File from {url}. File is unavailable")
}

/// A probe or transfer exceeded the configured timeout.
#[must_use]
pub fn timed_out(url: &str) -> String {
    format!("Unable to load File from {url}. Connection fails")
}

/// Generic transport or persistence failure, carrying the underlying
/// message.
#[must_use]
pub fn failure(url: &str, detail: &str) -> String {
    format!("Unable to load File from {url}. {detail}")
}

/// An admission condition rejected the resource's metadata.
#[must_use]
pub fn admission_failed(url: &str, kind: AdmissionError) -> String {
    let reason = match kind {
        AdmissionError::HeadersMalformed => "Headers are invalid",
        AdmissionError::ContentTypeRejected => "Invalid content type",
        AdmissionError::TooLarge => "File is too large",
        AdmissionError::TooSmall => "File is too small",
        AdmissionError::InsufficientSpace => "Low disk space",
    };
    format!("Unable to load File from {url}. {reason}")
}
