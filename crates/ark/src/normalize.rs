//! Outgoing image-reference normalization.
//!
//! ARK accepts an image either as a fetchable URL or as an embedded
//! data-URI; bare base64 payloads must be wrapped before transmission.
//! The rules below are ordered and the first match wins. Rule 3 is a
//! heuristic — a long whitespace-free string is assumed to be base64 —
//! kept as an explicit documented rule rather than a guarantee.

use crate::client::ArkError;

/// Prefix applied when wrapping a bare base64 payload.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Minimum length for a string to be treated as a bare base64 payload.
const BARE_PAYLOAD_MIN_LEN: usize = 100;

/// Normalize one image reference for transmission.
///
/// 1. `http://` / `https://` URLs pass through unchanged.
/// 2. `data:image/` URIs pass through unchanged.
/// 3. Anything longer than 100 chars without whitespace is wrapped as a
///    PNG data-URI.
/// 4. Everything else is rejected.
pub fn normalize_image_input(input: &str, index: usize) -> Result<String, ArkError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ArkError::Validation(format!(
            "Image input at index {index} is empty"
        )));
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(trimmed.to_string());
    }

    if trimmed.starts_with("data:image/") {
        return Ok(trimmed.to_string());
    }

    if trimmed.len() > BARE_PAYLOAD_MIN_LEN && !trimmed.contains(char::is_whitespace) {
        return Ok(format!("{DATA_URI_PREFIX}{trimmed}"));
    }

    Err(ArkError::Validation(format!(
        "Invalid image input at index {index}. Must be an http(s) URL or a data:image/... URI."
    )))
}
