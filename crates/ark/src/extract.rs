//! Upstream response-shape extraction.
//!
//! ModelArk deployments answer image generation in several shapes
//! depending on model family and API vintage. Rather than nested
//! branching, extraction runs an ordered list of shape matchers over
//! the parsed JSON; the first matcher yielding a non-empty URL wins,
//! and no match fails the call outright — never a partial result.

use serde_json::Value;

use crate::client::ArkError;

/// Upper bound on the diagnostic dump carried by an extraction error.
const MAX_DUMP_LEN: usize = 1200;

/// One recognizer for a known upstream response shape.
type ShapeMatcher = fn(&Value) -> Option<&str>;

/// Known image-result shapes, in priority order:
///
/// 1. `{ data: { image_urls: ["..."] } }`   (standard Seedream)
/// 2. `{ data: [{ url: "..." }] }`          (OpenAI-compatible)
/// 3. `{ data: [{ image_url: "..." }] }`    (alternative array form)
/// 4. `{ data: { url: "..." } }`            (flat nested object)
/// 5. `{ image_url: "..." }`                (root field)
const IMAGE_URL_MATCHERS: &[ShapeMatcher] = &[
    |v| v["data"]["image_urls"].get(0).and_then(Value::as_str),
    |v| v["data"].get(0).and_then(|e| e["url"].as_str()),
    |v| v["data"].get(0).and_then(|e| e["image_url"].as_str()),
    |v| v["data"]["url"].as_str(),
    |v| v["image_url"].as_str(),
];

/// Extract the canonical result URL from an image-generation response.
pub fn extract_image_url(body: &Value) -> Result<String, ArkError> {
    IMAGE_URL_MATCHERS
        .iter()
        .find_map(|matcher| matcher(body).filter(|url| !url.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| ArkError::Extraction(truncated_dump(body)))
}

/// Extract the task id from a video-task submission response.
///
/// Accepts `{ id: "..." }` or the wrapped `{ Result: { id: "..." } }`.
pub fn extract_task_id(body: &Value) -> Result<String, ArkError> {
    body["id"]
        .as_str()
        .or_else(|| body["Result"]["id"].as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ArkError::Extraction(truncated_dump(body)))
}

/// Render the response for diagnostics, truncated so an arbitrarily
/// large upstream payload never lands in logs or error bodies whole.
fn truncated_dump(body: &Value) -> String {
    let mut dump = body.to_string();
    if dump.len() > MAX_DUMP_LEN {
        let boundary = (0..=MAX_DUMP_LEN)
            .rev()
            .find(|i| dump.is_char_boundary(*i))
            .unwrap_or(0);
        dump.truncate(boundary);
    }
    dump
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn extracts_namespaced_url_array() {
        let body = json!({ "data": { "image_urls": ["https://ark.example/a.png"] } });
        assert_eq!(
            extract_image_url(&body).unwrap(),
            "https://ark.example/a.png"
        );
    }

    #[test]
    fn extracts_array_of_url_objects() {
        let body = json!({ "data": [{ "url": "https://ark.example/b.png" }] });
        assert_eq!(
            extract_image_url(&body).unwrap(),
            "https://ark.example/b.png"
        );
    }

    #[test]
    fn extracts_array_of_image_url_objects() {
        let body = json!({ "data": [{ "image_url": "https://ark.example/c.png" }] });
        assert_eq!(
            extract_image_url(&body).unwrap(),
            "https://ark.example/c.png"
        );
    }

    #[test]
    fn extracts_flat_nested_url() {
        let body = json!({ "data": { "url": "https://ark.example/d.png" } });
        assert_eq!(
            extract_image_url(&body).unwrap(),
            "https://ark.example/d.png"
        );
    }

    #[test]
    fn extracts_root_image_url() {
        let body = json!({ "image_url": "https://ark.example/e.png" });
        assert_eq!(
            extract_image_url(&body).unwrap(),
            "https://ark.example/e.png"
        );
    }

    #[test]
    fn priority_order_prefers_namespaced_array() {
        let body = json!({
            "data": { "image_urls": ["https://ark.example/first.png"] },
            "image_url": "https://ark.example/last.png",
        });
        assert_eq!(
            extract_image_url(&body).unwrap(),
            "https://ark.example/first.png"
        );
    }

    #[test]
    fn empty_url_does_not_match() {
        // An empty string in a higher-priority shape falls through to
        // the next matcher.
        let body = json!({
            "data": { "image_urls": [""] },
            "image_url": "https://ark.example/fallback.png",
        });
        assert_eq!(
            extract_image_url(&body).unwrap(),
            "https://ark.example/fallback.png"
        );
    }

    #[test]
    fn unrecognized_shape_fails_with_extraction_error() {
        let body = json!({ "data": { "images": ["https://ark.example/x.png"] } });
        assert_matches!(extract_image_url(&body), Err(ArkError::Extraction(_)));
    }

    #[test]
    fn extraction_dump_is_truncated() {
        let body = json!({ "blob": "x".repeat(5000) });
        let err = extract_image_url(&body).unwrap_err();
        match err {
            ArkError::Extraction(dump) => assert!(dump.len() <= MAX_DUMP_LEN),
            other => panic!("Expected Extraction, got {other:?}"),
        }
    }

    #[test]
    fn task_id_from_root() {
        let body = json!({ "id": "cgt-2026-abc" });
        assert_eq!(extract_task_id(&body).unwrap(), "cgt-2026-abc");
    }

    #[test]
    fn task_id_from_wrapped_result() {
        let body = json!({ "Result": { "id": "cgt-2026-def" } });
        assert_eq!(extract_task_id(&body).unwrap(), "cgt-2026-def");
    }

    #[test]
    fn missing_task_id_fails() {
        let body = json!({ "status": "queued" });
        assert_matches!(extract_task_id(&body), Err(ArkError::Extraction(_)));
    }
}
