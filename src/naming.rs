//! Artifact naming and the dedup pre-check
//!
//! The artifact name is the dedup key: two resources with the same content
//! fingerprint and media type collapse to the same file name, so the second
//! fetch finds the file on disk and skips its transfer entirely.

use chrono::Utc;
use std::path::Path;

/// Derive the on-disk artifact name for a resource.
///
/// The base name comes from the content fingerprint:
/// - a fingerprint that parses as a JSON string literal (the usual quoted
///   ETag form, e.g. `"abc"`) contributes its unquoted content;
/// - any other fingerprint text is used verbatim;
/// - with no fingerprint at all, a time-based `image_{unix-timestamp}`
///   placeholder is synthesized. Uniqueness of the placeholder is
///   best-effort only: two fingerprint-less fetches within the same second
///   collide, and the later write overwrites the earlier one. That
///   coarseness is a known weak point of the naming scheme, kept visible
///   rather than papered over.
///
/// The extension is the media-type subtype (the text after `/`), so
/// `("\"etag\"", "image/jpeg")` and `("etag", "image/jpeg")` both yield
/// `etag.jpeg`. Derivation is idempotent for present fingerprints.
#[must_use]
pub fn artifact_name(fingerprint: Option<&str>, content_type: &str) -> String {
    let base = match fingerprint {
        Some(raw) => serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string()),
        None => format!("image_{}", Utc::now().timestamp()),
    };
    let subtype = content_type.split('/').nth(1).unwrap_or(content_type);
    format!("{base}.{subtype}")
}

/// Dedup pre-check: is the derived artifact already present in the
/// download directory?
///
/// This runs before the body transfer, not at write time — two workers in
/// the same batch can both see "absent" for the same name and both write.
/// The content is presumed identical for equal fingerprints, so the
/// overwrite is harmless.
#[must_use]
pub fn artifact_exists(name: &str, download_dir: &Path) -> bool {
    download_dir.join(name).is_file()
}
