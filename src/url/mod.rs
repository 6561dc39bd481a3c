//! Input URL normalization
//!
//! Enqueued identifiers may arrive without a scheme ("example.com"); before
//! they enter the queue the configured default scheme is prefixed so every
//! work item carries a fetchable URL.

/// Normalizes a raw identifier by prefixing the default scheme when absent
///
/// Only the presence of an `http://`/`https://` prefix is inspected; the
/// identifier is otherwise passed through untouched (repeated identifiers
/// are deliberately not deduplicated by the caller).
///
/// # Examples
///
/// ```
/// use kumo::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com", "http"), "http://example.com");
/// assert_eq!(ensure_scheme("https://example.com", "http"), "https://example.com");
/// ```
pub fn ensure_scheme(raw: &str, default_scheme: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("{}://{}", default_scheme, trimmed)
    }
}

/// Checks that a normalized URL parses as a valid absolute URL
///
/// Used by callers that want to reject garbage input up front; the scheduler
/// core itself accepts any identifier and lets the fetch capability fail.
pub fn is_valid_url(normalized: &str) -> bool {
    url::Url::parse(normalized).is_ok()
}
