//! REST client for the ARK generation endpoints.
//!
//! One [`ArkClient`] serves the whole process, reusing a shared
//! [`reqwest::Client`] for connection pooling.

use serde_json::json;

use crate::extract;
use crate::normalize::normalize_image_input;

/// Maximum length of an upstream error body carried in logs.
const ERROR_BODY_LOG_LEN: usize = 500;

/// Default duration of a generated video clip, in seconds.
const DEFAULT_VIDEO_DURATION_SECS: u32 = 5;

/// Default resolution of a generated video clip.
const DEFAULT_VIDEO_RESOLUTION: &str = "480p";

/// Errors from the ARK client.
#[derive(Debug, thiserror::Error)]
pub enum ArkError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// An outgoing image reference could not be normalized.
    #[error("Invalid image input: {0}")]
    Validation(String),

    /// ARK returned a non-success status code.
    #[error("Upstream error ({status}): {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Raw response body for diagnostics.
        body: String,
    },

    /// A success response carried none of the known result shapes.
    #[error("No media URL found in upstream response: {0}")]
    Extraction(String),
}

/// Parameters for starting an asynchronous video generation task.
#[derive(Debug, Clone)]
pub struct VideoTaskRequest {
    pub model: String,
    pub prompt: String,
    /// Input image the clip animates, as a fetchable URL or data-URI.
    pub image_url: Option<String>,
    /// Clip length in seconds; upstream default is 5.
    pub duration: Option<u32>,
    /// Target resolution, e.g. `480p`; upstream default is `480p`.
    pub resolution: Option<String>,
}

/// HTTP client for one ARK deployment.
pub struct ArkClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ArkClient {
    /// Create a client for the ARK API at `base_url` (trailing slashes
    /// stripped), reusing an existing [`reqwest::Client`].
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Base API URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate an image from `images` + `prompt` with the given model.
    ///
    /// Every reference in `images` is normalized to a URL or data-URI
    /// before transmission; a reference that fits neither fails the
    /// call with [`ArkError::Validation`] without touching the network.
    /// Returns the canonical result URL.
    pub async fn generate_image(
        &self,
        images: &[String],
        prompt: &str,
        model: &str,
    ) -> Result<String, ArkError> {
        let normalized = images
            .iter()
            .enumerate()
            .map(|(i, img)| normalize_image_input(img, i))
            .collect::<Result<Vec<_>, _>>()?;

        let body = json!({
            "model": model,
            "prompt": prompt,
            "image": normalized,
            "response_format": "url",
            "size": "2K",
            "stream": false,
            "watermark": true,
            "sequential_image_generation": "disabled",
        });

        let response = self
            .http
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let data = Self::parse_success(response).await?;
        let url = extract::extract_image_url(&data)?;

        tracing::debug!(model, "ARK image generation succeeded");
        Ok(url)
    }

    /// Start an asynchronous video generation task and return its
    /// upstream task id. Completion is owned by the external queue;
    /// this call only enqueues.
    pub async fn start_video_task(&self, request: &VideoTaskRequest) -> Result<String, ArkError> {
        let mut content = vec![json!({ "type": "text", "text": request.prompt })];
        if let Some(url) = &request.image_url {
            content.push(json!({ "type": "image_url", "image_url": { "url": url } }));
        }

        let body = json!({
            "model": request.model,
            "content": content,
            "parameters": {
                "duration": request.duration.unwrap_or(DEFAULT_VIDEO_DURATION_SECS),
                "resolution": request
                    .resolution
                    .as_deref()
                    .unwrap_or(DEFAULT_VIDEO_RESOLUTION),
                "audio": false,
            },
        });

        let response = self
            .http
            .post(format!("{}/contents/generations/tasks", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let data = Self::parse_success(response).await?;
        let task_id = extract::extract_task_id(&data)?;

        tracing::info!(model = %request.model, task_id = %task_id, "ARK video task started");
        Ok(task_id)
    }

    // ---- private helpers ----

    /// Ensure a success status and parse the JSON body. A non-success
    /// status yields [`ArkError::Upstream`] carrying the raw body.
    async fn parse_success(response: reqwest::Response) -> Result<serde_json::Value, ArkError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(
                status = status.as_u16(),
                body = %body.chars().take(ERROR_BODY_LOG_LEN).collect::<String>(),
                "ARK request failed"
            );
            return Err(ArkError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = ArkClient::new(
            reqwest::Client::new(),
            "https://ark.ap-southeast.bytepluses.com/api/v3/",
            "key",
        );
        assert_eq!(
            client.base_url(),
            "https://ark.ap-southeast.bytepluses.com/api/v3"
        );
    }

    #[tokio::test]
    async fn invalid_reference_fails_before_any_request() {
        // Unroutable base URL: if validation did not short-circuit, the
        // call would fail with a Request error instead.
        let client = ArkClient::new(reqwest::Client::new(), "http://127.0.0.1:1", "key");
        let err = client
            .generate_image(&["too short".to_string()], "prompt", "seedream-4-0-250828")
            .await
            .unwrap_err();
        assert_matches::assert_matches!(err, ArkError::Validation(_));
    }
}
