//! Background job orchestrator.
//!
//! One submitted capture becomes one detached job task:
//! best-effort original upload, generation, composite, final upload,
//! with the notification registry tracking the outcome. Jobs for
//! distinct captures run independently; a failure in one never touches
//! another. Submission is always accepted and concurrency is
//! unbounded.

use std::sync::Arc;

use async_trait::async_trait;
use snapbooth_ark::{ArkClient, ArkError};
use snapbooth_core::compositor::{self, Compositor};
use snapbooth_core::concept::Concept;
use snapbooth_core::settings::BoothSettings;
use snapbooth_core::types::{Job, JobId, Notification, NotificationStatus};
use snapbooth_drive::{DriveClient, DriveError, UploadMeta, UploadReceipt};

use crate::notifications::{NotificationCenter, EXPIRE_DELAY};
use crate::settings_sync::SettingsHandle;

/// Concept label stamped on raw-capture pre-uploads.
pub const ORIGINAL_CONCEPT_NAME: &str = "ORIGINAL_CAPTURE";

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// The upstream image-generation collaborator.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate an image and return the canonical result URL (or
    /// data-URI).
    async fn generate_image(
        &self,
        images: &[String],
        prompt: &str,
        model: &str,
    ) -> Result<String, ArkError>;
}

#[async_trait]
impl GenerationBackend for ArkClient {
    async fn generate_image(
        &self,
        images: &[String],
        prompt: &str,
        model: &str,
    ) -> Result<String, ArkError> {
        ArkClient::generate_image(self, images, prompt, model).await
    }
}

/// The remote-storage collaborator.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Upload raw image bytes.
    async fn upload(&self, image: &[u8], meta: &UploadMeta) -> Result<UploadReceipt, DriveError>;

    /// Upload an image already held as a data-URI or bare base64
    /// string.
    async fn upload_data_uri(
        &self,
        image: &str,
        meta: &UploadMeta,
    ) -> Result<UploadReceipt, DriveError>;
}

#[async_trait]
impl RemoteStore for DriveClient {
    async fn upload(&self, image: &[u8], meta: &UploadMeta) -> Result<UploadReceipt, DriveError> {
        DriveClient::upload(self, image, meta).await
    }

    async fn upload_data_uri(
        &self,
        image: &str,
        meta: &UploadMeta,
    ) -> Result<UploadReceipt, DriveError> {
        DriveClient::upload_data_uri(self, image, meta).await
    }
}

// ---------------------------------------------------------------------------
// Job errors
// ---------------------------------------------------------------------------

/// Failure of a single job step. Internal to the orchestrator: jobs
/// surface outcomes only through the notification registry.
#[derive(Debug, thiserror::Error)]
enum JobError {
    #[error(transparent)]
    Generation(#[from] ArkError),

    #[error("Failed to fetch generated media: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Invalid generated media reference: {0}")]
    Media(String),

    #[error(transparent)]
    Upload(#[from] DriveError),
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Spawns and drives background generation jobs.
///
/// Cheaply cloneable; each submitted job captures a clone and runs on
/// its own task.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn GenerationBackend>,
    store: Arc<dyn RemoteStore>,
    compositor: Arc<Compositor>,
    notifications: NotificationCenter,
    settings: SettingsHandle,
    http: reqwest::Client,
    /// Image model used when the synced settings do not name one.
    fallback_image_model: String,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        store: Arc<dyn RemoteStore>,
        compositor: Arc<Compositor>,
        notifications: NotificationCenter,
        settings: SettingsHandle,
        http: reqwest::Client,
        fallback_image_model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            store,
            compositor,
            notifications,
            settings,
            http,
            fallback_image_model: fallback_image_model.into(),
        }
    }

    /// Submit a capture for background processing.
    ///
    /// Returns immediately with the job id; a Processing notification
    /// is already registered when this returns. The caller never
    /// observes job failure directly.
    pub fn submit(&self, image: String, concept: Concept) -> JobId {
        let job = Job::new(image, concept);
        let id = job.id;

        self.notifications.add(Notification::processing(&job));

        let orchestrator = self.clone();
        tokio::spawn(async move {
            orchestrator.run(job).await;
        });

        id
    }

    /// Drive one job to its terminal notification state.
    async fn run(self, job: Job) {
        tracing::info!(job_id = %job.id, concept = %job.concept.name, "Background job started");

        let status = match self.execute(&job).await {
            Ok(()) => {
                tracing::info!(job_id = %job.id, "Background job completed");
                NotificationStatus::Completed
            }
            Err(err) => {
                tracing::error!(job_id = %job.id, error = %err, "Background job failed");
                NotificationStatus::Failed
            }
        };

        self.notifications.update(job.id, status);
        self.notifications.schedule_expire(job.id, EXPIRE_DELAY);
    }

    async fn execute(&self, job: &Job) -> Result<(), JobError> {
        let settings = self.settings.snapshot();

        // 1. Best-effort pre-upload of the raw capture.
        let original_id = if settings.originals_configured() {
            self.upload_original(job, &settings).await
        } else {
            None
        };

        // 2. Generation. Any failure here is terminal.
        let model = if settings.image_model.trim().is_empty() {
            self.fallback_image_model.as_str()
        } else {
            settings.image_model.as_str()
        };
        let result_url = self
            .backend
            .generate_image(std::slice::from_ref(&job.image), &job.concept.prompt, model)
            .await?;

        // 3. Materialize the result and composite the overlay.
        // Compositing is fail-open; only the fetch can abort.
        let base = self.fetch_media(&result_url).await?;
        let (width, height) = settings.output_ratio.output_size();
        let final_image = self
            .compositor
            .compose(&base, settings.overlay(), width, height)
            .await;

        // 4. Final upload to the primary destination.
        let receipt = self
            .store
            .upload(
                &final_image,
                &UploadMeta {
                    concept_name: job.concept.name.clone(),
                    event_name: settings.event_name.clone(),
                    event_id: settings.active_event_id.clone(),
                    folder_id: settings.folder_id.clone(),
                    original_id,
                    skip_gallery: false,
                },
            )
            .await?;

        if !receipt.ok {
            return Err(JobError::Upload(DriveError::Rejected(
                receipt
                    .error
                    .unwrap_or_else(|| "bridge reported failure".to_string()),
            )));
        }

        Ok(())
    }

    /// Upload the raw capture to the originals destination.
    ///
    /// Never fails the job: a rejected or failed upload is logged and
    /// the job continues without an original id.
    async fn upload_original(&self, job: &Job, settings: &BoothSettings) -> Option<String> {
        let meta = UploadMeta {
            concept_name: ORIGINAL_CONCEPT_NAME.to_string(),
            event_name: settings.event_name.clone(),
            event_id: settings.active_event_id.clone(),
            folder_id: settings.original_folder_id.clone(),
            original_id: None,
            skip_gallery: true,
        };

        match self.store.upload_data_uri(&job.image, &meta).await {
            Ok(receipt) if receipt.ok => receipt.id,
            Ok(receipt) => {
                tracing::warn!(
                    job_id = %job.id,
                    error = receipt.error.as_deref().unwrap_or("unknown"),
                    "Original upload rejected, continuing without it"
                );
                None
            }
            Err(err) => {
                tracing::warn!(
                    job_id = %job.id,
                    error = %err,
                    "Original upload failed, continuing without it"
                );
                None
            }
        }
    }

    /// Fetch the generated result into bytes.
    ///
    /// Accepts a data-URI (decoded in place) or a URL (fetched over
    /// HTTP). Failures count as generation-step failures.
    async fn fetch_media(&self, reference: &str) -> Result<Vec<u8>, JobError> {
        if reference.starts_with("data:") {
            return compositor::decode_data_uri(reference)
                .ok_or_else(|| JobError::Media("undecodable data-URI".to_string()));
        }

        let response = self
            .http
            .get(reference)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
