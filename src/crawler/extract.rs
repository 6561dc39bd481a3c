//! Derived-value extraction
//!
//! A fetched page is reduced to the substring between the literal
//! `<title>` and `</title>` markers. This is deliberately plain string
//! scanning, not an HTML parser: pages without both markers (or with them
//! in the wrong order) yield a sentinel value rather than an error.

/// Sentinel returned when the title markers are absent
pub const NO_TITLE_FOUND: &str = "No Title Found";

const TITLE_OPEN: &str = "<title>";
const TITLE_CLOSE: &str = "</title>";

/// Extracts the text between the title markers, or the sentinel
///
/// # Examples
///
/// ```
/// use kumo::crawler::{extract_title, NO_TITLE_FOUND};
///
/// assert_eq!(extract_title("<html><title>Hello</title></html>"), "Hello");
/// assert_eq!(extract_title("<html><body>no title</body></html>"), NO_TITLE_FOUND);
/// ```
pub fn extract_title(content: &str) -> String {
    let Some(open) = content.find(TITLE_OPEN) else {
        return NO_TITLE_FOUND.to_string();
    };
    let start = open + TITLE_OPEN.len();

    match content[start..].find(TITLE_CLOSE) {
        Some(end) => content[start..start + end].to_string(),
        None => NO_TITLE_FOUND.to_string(),
    }
}
