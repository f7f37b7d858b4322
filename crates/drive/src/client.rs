//! HTTP client for the Drive bridge web app.
//!
//! All calls go to a single base URL; the `action` field of the JSON
//! body (or query string, for reads) selects the operation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::settings::{EventInfo, SettingsEnvelope};

/// Errors from the Drive bridge layer.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The bridge returned a non-success status code.
    #[error("Drive bridge error ({status}): {body}")]
    Bridge {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The bridge answered but reported the upload as not ok.
    #[error("Upload rejected: {0}")]
    Rejected(String),
}

/// Destination and labeling metadata for one upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMeta {
    pub concept_name: String,
    pub event_name: String,
    pub event_id: String,
    /// Target Drive folder.
    pub folder_id: String,
    /// Id of the previously uploaded raw capture, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    /// Keep the upload out of the public gallery (used for raw
    /// captures).
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip_gallery: bool,
}

/// Bridge response to an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub ok: bool,
    /// Stable identifier of the stored file, present when `ok`.
    #[serde(default)]
    pub id: Option<String>,
    /// Bridge-reported failure reason, when not `ok`.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    action: &'static str,
    /// Image payload as a data-URI.
    image: &'a str,
    #[serde(flatten)]
    meta: &'a UploadMeta,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatusRequest<'a> {
    action: &'static str,
    photo_id: &'a str,
    status: &'static str,
    task_id: &'a str,
    video_model: &'a str,
}

/// HTTP client for one Drive bridge deployment.
pub struct DriveClient {
    http: reqwest::Client,
    base_url: String,
}

impl DriveClient {
    /// Create a client for the bridge at `base_url`, reusing an
    /// existing [`reqwest::Client`].
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Upload raw image bytes, wrapping them as a JPEG data-URI.
    pub async fn upload(
        &self,
        image: &[u8],
        meta: &UploadMeta,
    ) -> Result<UploadReceipt, DriveError> {
        let data_uri = format!("data:image/jpeg;base64,{}", BASE64.encode(image));
        self.upload_data_uri(&data_uri, meta).await
    }

    /// Upload an image already held as a data-URI (or bare base64, as
    /// captures arrive from the kiosk), passing the payload through
    /// unchanged.
    pub async fn upload_data_uri(
        &self,
        image: &str,
        meta: &UploadMeta,
    ) -> Result<UploadReceipt, DriveError> {
        let body = UploadRequest {
            action: "upload",
            image,
            meta,
        };

        let response = self
            .http
            .post(&self.base_url)
            .json(&body)
            .send()
            .await?;

        let receipt: UploadReceipt = Self::parse_response(response).await?;
        if receipt.ok {
            tracing::debug!(
                folder_id = %meta.folder_id,
                id = receipt.id.as_deref().unwrap_or(""),
                "Upload stored"
            );
        }
        Ok(receipt)
    }

    /// Register a started video task against the bridge-backed queue so
    /// the tick cycle can advance it.
    ///
    /// Callers treat this as fire-and-forget; the error is returned only
    /// so the spawning side can log it.
    pub async fn register_video_task(
        &self,
        photo_id: &str,
        task_id: &str,
        video_model: &str,
    ) -> Result<(), DriveError> {
        let body = VideoStatusRequest {
            action: "updateVideoStatus",
            photo_id,
            status: "processing",
            task_id,
            video_model,
        };

        let response = self
            .http
            .post(&self.base_url)
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Fetch global booth settings (and the concept list) from the
    /// bridge.
    pub async fn fetch_settings(&self) -> Result<SettingsEnvelope, DriveError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("action", "getSettings")])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the event list. The caller picks the active event.
    pub async fn fetch_events(&self) -> Result<Vec<EventInfo>, DriveError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("action", "getEvents")])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, then parse the
    /// JSON body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DriveError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), DriveError> {
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, DriveError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DriveError::Bridge {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_request_serializes_flat_camel_case() {
        let meta = UploadMeta {
            concept_name: "Cyberpunk".into(),
            event_name: "Launch Party".into(),
            event_id: "ev-1".into(),
            folder_id: "folder-9".into(),
            original_id: Some("orig-3".into()),
            skip_gallery: false,
        };
        let body = UploadRequest {
            action: "upload",
            image: "data:image/jpeg;base64,AAAA",
            meta: &meta,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["action"], "upload");
        assert_eq!(json["conceptName"], "Cyberpunk");
        assert_eq!(json["folderId"], "folder-9");
        assert_eq!(json["originalId"], "orig-3");
        // skip_gallery=false is omitted entirely.
        assert!(json.get("skipGallery").is_none());
    }

    #[test]
    fn skip_gallery_is_serialized_when_set() {
        let meta = UploadMeta {
            concept_name: "ORIGINAL_CAPTURE".into(),
            event_name: String::new(),
            event_id: String::new(),
            folder_id: "originals".into(),
            original_id: None,
            skip_gallery: true,
        };
        let body = UploadRequest {
            action: "upload",
            image: "data:image/jpeg;base64,AAAA",
            meta: &meta,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["skipGallery"], true);
        assert!(json.get("originalId").is_none());
    }

    #[test]
    fn receipt_parses_with_and_without_id() {
        let ok: UploadReceipt = serde_json::from_str(r#"{"ok":true,"id":"abc"}"#).unwrap();
        assert!(ok.ok);
        assert_eq!(ok.id.as_deref(), Some("abc"));

        let rejected: UploadReceipt =
            serde_json::from_str(r#"{"ok":false,"error":"quota exceeded"}"#).unwrap();
        assert!(!rejected.ok);
        assert_eq!(rejected.error.as_deref(), Some("quota exceeded"));
    }
}
