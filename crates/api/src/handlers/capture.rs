//! Handler for capture submission.
//!
//! The kiosk shows its thank-you screen as soon as this returns; the
//! actual work happens in the background and only ever surfaces
//! through the notification feed.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use snapbooth_core::concept::Concept;
use snapbooth_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /api/captures`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    /// The captured photo, as a data-URI or bare base64 payload.
    pub image_base64: String,
    /// The concept the guest selected.
    pub concept: Concept,
}

/// POST /api/captures
///
/// Register a capture for background processing. Always answers 202
/// immediately; the job's outcome is visible only in the notification
/// feed.
pub async fn submit_capture(
    State(state): State<AppState>,
    Json(request): Json<CaptureRequest>,
) -> AppResult<impl IntoResponse> {
    if request.image_base64.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Captured image must not be empty".to_string(),
        )));
    }

    let job_id = state
        .orchestrator
        .submit(request.image_base64, request.concept);

    tracing::info!(%job_id, "Capture accepted for background processing");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "ok": true,
            "jobId": job_id,
            "status": "processing",
        })),
    ))
}
