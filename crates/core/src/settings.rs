//! Booth settings: the read-only configuration snapshot the kiosk runs
//! under, plus the output-resolution table and model-name guards.
//!
//! Settings are fetched from the settings/events collaborator and
//! swapped into a shared handle by the pipeline's sync task; everything
//! downstream only ever reads a snapshot.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Model defaults and guards
// ---------------------------------------------------------------------------

/// Fallback image-generation model when neither the synced settings nor
/// the environment name one.
pub const DEFAULT_IMAGE_MODEL: &str = "seedream-4-0-250828";

/// Fallback video-generation model.
pub const DEFAULT_VIDEO_MODEL: &str = "seedance-1-0-pro-fast-251015";

/// Required prefix for any model used on the video path.
pub const VIDEO_MODEL_PREFIX: &str = "seedance";

/// Validate that a model name is allowed on the video path.
///
/// Only `seedance`-family models may be started as async video tasks;
/// anything else is rejected before the upstream call.
pub fn validate_video_model(model: &str) -> Result<(), CoreError> {
    if model.starts_with(VIDEO_MODEL_PREFIX) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid video model '{model}'. Must start with '{VIDEO_MODEL_PREFIX}'."
        )))
    }
}

// ---------------------------------------------------------------------------
// Output aspect ratio
// ---------------------------------------------------------------------------

/// Output aspect ratio of the final composited image.
///
/// Each ratio maps to a fixed output resolution; the portrait 9:16
/// default matches the kiosk's native screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "3:2")]
    Classic,
    #[serde(rename = "2:3")]
    ClassicPortrait,
}

impl AspectRatio {
    /// Output surface dimensions (width, height) in pixels.
    pub fn output_size(self) -> (u32, u32) {
        match self {
            Self::Portrait => (1080, 1920),
            Self::Landscape => (1920, 1080),
            Self::Classic => (1800, 1200),
            Self::ClassicPortrait => (1200, 1800),
        }
    }
}

// ---------------------------------------------------------------------------
// Booth modes
// ---------------------------------------------------------------------------

/// What kind of media the booth produces.
///
/// The external task ticker only polls while the booth is in video mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothMode {
    #[default]
    Photo,
    Video,
}

/// How the guest-facing flow behaves after a capture.
///
/// `Fast` hands the capture to the background orchestrator and shows a
/// thank-you screen immediately; `Standard` keeps the guest on a live
/// result screen. The orchestration core only ever sees `Fast` jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Standard,
    #[default]
    Fast,
}

// ---------------------------------------------------------------------------
// BoothSettings
// ---------------------------------------------------------------------------

/// Global booth configuration, merged from the settings collaborator and
/// the currently active event.
///
/// All fields are optional on the wire; missing fields keep their
/// defaults so a partial settings payload never breaks the booth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoothSettings {
    /// Display name of the active event.
    pub event_name: String,
    pub event_description: String,
    /// Id of the active event, stamped onto every upload.
    pub active_event_id: String,
    /// Primary destination folder for final images.
    pub folder_id: String,
    /// Optional destination for raw captures. Blank disables the
    /// best-effort original upload.
    pub original_folder_id: String,
    /// Branding overlay reference (URL, Drive share link, or data-URI).
    /// Blank disables compositing.
    pub overlay_image: String,
    pub output_ratio: AspectRatio,
    pub booth_mode: BoothMode,
    pub processing_mode: ProcessingMode,
    /// Image-generation model; blank falls back to the server default.
    pub image_model: String,
    /// Video-generation model; blank falls back to the server default.
    pub video_model: String,
}

impl BoothSettings {
    /// Whether the original-capture pre-upload is configured.
    pub fn originals_configured(&self) -> bool {
        !self.original_folder_id.trim().is_empty()
    }

    /// The overlay reference, if one is configured.
    pub fn overlay(&self) -> Option<&str> {
        let trimmed = self.overlay_image.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
