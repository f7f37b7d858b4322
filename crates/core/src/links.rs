//! Google Drive link resolution.
//!
//! Drive share links (`...?id=<id>` or `.../d/<id>/...`) are not
//! directly fetchable by an image decoder; the `lh3.googleusercontent`
//! form renders the file bytes without redirects or rate-limit
//! interstitials. Anything that is not recognizably a Drive link passes
//! through unchanged.

use std::sync::LazyLock;

use regex::Regex;

static QUERY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id=([a-zA-Z0-9_-]+)").expect("valid regex"));

static PATH_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("valid regex"));

/// Extract the Drive file id from a share link, if present.
fn file_id(url: &str) -> Option<&str> {
    QUERY_ID_RE
        .captures(url)
        .or_else(|| PATH_ID_RE.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrite a Drive share link into a directly fetchable image URL.
///
/// Data-URIs and non-Drive URLs pass through unchanged; empty input
/// stays empty.
pub fn direct_link(url: &str) -> String {
    if url.is_empty() || url.starts_with("data:") {
        return url.to_string();
    }
    match file_id(url) {
        Some(id) => format!("https://lh3.googleusercontent.com/d/{id}"),
        None => url.to_string(),
    }
}

/// Build the raw-download URL for a Drive file id.
///
/// Used on the video path, where upstream needs a plain byte stream
/// rather than a rendered image page.
pub fn download_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={file_id}")
}
