//! Handler for starting asynchronous video generation tasks.
//!
//! The task runs on the upstream queue; the bridge-backed queue entry
//! (registered fire-and-forget) lets the tick cycle advance it. The
//! handler answers as soon as the upstream task exists.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use snapbooth_ark::VideoTaskRequest;
use snapbooth_core::error::CoreError;
use snapbooth_core::links;
use snapbooth_core::settings::validate_video_model;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fallback prompt when the caller supplies none.
const DEFAULT_VIDEO_PROMPT: &str = "Cinematic movement";

/// Body of `POST /api/video/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    pub prompt: Option<String>,
    /// Embedded input image; used only when no Drive file id is given.
    pub image_base64: Option<String>,
    /// Drive id of the source photo. Preferred over `imageBase64`
    /// because upstream fetches a plain URL more reliably than it
    /// accepts large embedded payloads.
    pub drive_file_id: Option<String>,
    /// Session folder the kiosk groups regenerations under.
    pub session_folder_id: Option<String>,
    pub model: Option<String>,
    pub resolution: Option<String>,
}

/// POST /api/video/generate
///
/// Validate the model against the allow-list, resolve the input image,
/// start the upstream task, and register it against the external queue
/// (fire-and-forget).
pub async fn generate_video(
    State(state): State<AppState>,
    Json(request): Json<GenerateVideoRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let settings = state.settings.snapshot();

    let model = request
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let synced = settings.video_model.trim();
            (!synced.is_empty()).then(|| synced.to_string())
        })
        .unwrap_or_else(|| state.config.video_model.clone());

    validate_video_model(&model)?;

    tracing::info!(
        model = %model,
        session_folder_id = request.session_folder_id.as_deref().unwrap_or(""),
        "Starting video task"
    );

    let input_image = match (&request.drive_file_id, &request.image_base64) {
        (Some(file_id), _) if !file_id.trim().is_empty() => links::download_url(file_id.trim()),
        (_, Some(image)) if !image.trim().is_empty() => image.clone(),
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "No input image provided (driveFileId required)".to_string(),
            )))
        }
    };

    let task_id = state
        .ark
        .start_video_task(&VideoTaskRequest {
            model: model.clone(),
            prompt: request
                .prompt
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_VIDEO_PROMPT.to_string()),
            image_url: Some(input_image),
            duration: None,
            resolution: request.resolution.clone(),
        })
        .await?;

    // Queue registration is best-effort: the tick cycle picks the task
    // up from the bridge, but a failed registration must not fail the
    // request that already started the upstream task.
    if let Some(file_id) = request
        .drive_file_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        let drive = state.drive.clone();
        let file_id = file_id.to_string();
        let task_id_for_queue = task_id.clone();
        let model_for_queue = model.clone();
        tokio::spawn(async move {
            if let Err(err) = drive
                .register_video_task(&file_id, &task_id_for_queue, &model_for_queue)
                .await
            {
                tracing::error!(error = %err, task_id = %task_id_for_queue, "Failed to register video task with the queue");
            }
        });
    }

    Ok(Json(json!({
        "ok": true,
        "taskId": task_id,
        "status": "processing",
        "message": "Video generation started",
    })))
}
