//! File-key extraction from a pasted design-file URL.
//!
//! Only the two canonical shapes are recognised:
//! `figma.com/design/<key>` and `figma.com/file/<key>`. The match may appear
//! anywhere in the input, so scheme, `www.` and trailing path segments or
//! query strings are all accepted. Short links and prototype URLs are not.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_FILE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"figma\.com/(?:design|file)/([a-zA-Z0-9]+)").unwrap());

/// Return the file key embedded in `url`, or `None` when it has no
/// recognisable design/file segment.
pub fn extract_file_key(url: &str) -> Option<String> {
    RE_FILE_KEY
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
