//! Job and notification records.
//!
//! A [`Job`] lives exactly as long as its background task; only the
//! [`Notification`] derived from it is visible outside the pipeline.
//! Nothing here is persisted — all job state is lost on restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::concept::Concept;

/// Unique identifier of one background generation job.
///
/// Also identifies the job's [`Notification`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One capture's generation request, from submission to completion or
/// failure. Owned exclusively by the orchestrator task driving it.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    /// The raw captured image as submitted (data-URI or bare base64).
    pub image: String,
    /// The transformation theme the guest selected.
    pub concept: Concept,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(image: String, concept: Concept) -> Self {
        Self {
            id: JobId::new(),
            image,
            concept,
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle state of a background job as surfaced to the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Processing,
    Completed,
    Failed,
}

impl NotificationStatus {
    /// Whether this status ends the notification's lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Ephemeral, externally visible status record for one job.
///
/// Created when the job is submitted (Processing), moved exactly once to
/// a terminal status, and removed a fixed delay after that.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: JobId,
    /// Name of the concept the job is rendering, for the badge label.
    pub concept_name: String,
    /// Concept thumbnail reference, for the badge artwork.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build the initial Processing entry for a freshly submitted job.
    pub fn processing(job: &Job) -> Self {
        Self {
            id: job.id,
            concept_name: job.concept.name.clone(),
            thumbnail: job.concept.thumbnail.clone(),
            status: NotificationStatus::Processing,
            created_at: Utc::now(),
        }
    }
}
