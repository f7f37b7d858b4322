use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use snapbooth_ark::ArkError;
use snapbooth_core::error::CoreError;
use snapbooth_drive::DriveError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain and collaborator errors and implements
/// [`IntoResponse`] to produce consistent JSON error bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `snapbooth_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the ARK generation client.
    #[error(transparent)]
    Ark(#[from] ArkError),

    /// An error from the Drive bridge client.
    #[error(transparent)]
    Drive(#[from] DriveError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Upstream { status, body } => (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    format!("Upstream error ({status}): {body}"),
                ),
                CoreError::Extraction(msg) => {
                    (StatusCode::BAD_GATEWAY, "EXTRACTION_ERROR", msg.clone())
                }
                CoreError::Upload(msg) => (StatusCode::BAD_GATEWAY, "UPLOAD_ERROR", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Generation client errors ---
            // Upstream-reported failures map to 502; everything else
            // (our own request plumbing) is a plain 500.
            AppError::Ark(ark) => match ark {
                ArkError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                ArkError::Upstream { .. } | ArkError::Extraction(_) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", ark.to_string())
                }
                ArkError::Request(err) => {
                    tracing::error!(error = %err, "ARK request error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Drive bridge errors ---
            AppError::Drive(drive) => match drive {
                DriveError::Bridge { .. } | DriveError::Rejected(_) => {
                    (StatusCode::BAD_GATEWAY, "UPLOAD_ERROR", drive.to_string())
                }
                DriveError::Request(err) => {
                    tracing::error!(error = %err, "Drive bridge request error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
