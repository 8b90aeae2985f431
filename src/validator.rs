//! Locator validation
//!
//! A locator is admitted into a run only if it matches an absolute
//! HTTP(S) URL grammar: required scheme, at least one host label, a
//! top-level label of 2-25 word characters, optional port, optional
//! path/query/fragment tail. Everything else — including the empty
//! string — is invalid input, not an error.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Pattern is a compile-time constant, the unwrap cannot fire
#[allow(clippy::unwrap_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(http|https)://\w+([\-.]\w+)*\.\w{2,25}(:[0-9]{1,5})?(/.*)?$").unwrap()
});

/// Check a candidate string against the URL grammar.
#[must_use]
pub fn is_valid_locator(candidate: &str) -> bool {
    URL_PATTERN.is_match(candidate)
}

/// Drop repeated locators from an already-validated set, keeping the first
/// occurrence of each and preserving insertion order.
///
/// Dedup happens once, up front, against the whole input set — two distinct
/// URLs that later resolve to the same artifact name are intentionally not
/// collapsed here (the on-disk existence check handles that case).
#[must_use]
pub fn dedup_preserving_order(locators: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    locators
        .into_iter()
        .filter(|locator| seen.insert(locator.clone()))
        .collect()
}
