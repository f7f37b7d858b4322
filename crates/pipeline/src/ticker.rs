//! Fixed-interval poller for the external video-task queue.
//!
//! The queue (bridge-backed) owns task completion and retry semantics;
//! this loop only nudges it. One idempotent poll every five seconds
//! while the booth is in video mode. A failed or malformed poll is
//! silently skipped — a miss never escalates into an error.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use snapbooth_core::settings::BoothMode;
use tokio_util::sync::CancellationToken;

use crate::settings_sync::SettingsHandle;

/// Poll period of the external task queue.
pub const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Counters reported by a successful tick.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TickReport {
    /// Tasks that finished processing during this tick.
    #[serde(default)]
    pub processed: u64,
    /// Tasks newly started during this tick.
    #[serde(default)]
    pub started: u64,
}

#[derive(Debug, Deserialize)]
struct TickEnvelope {
    report: Option<TickReport>,
}

/// Run the tick loop until `cancel` is triggered.
///
/// Polls are skipped (not rescheduled) while the booth is not in video
/// mode, so flipping the mode in settings starts and stops polling
/// without restarting the task.
pub async fn run(
    http: reqwest::Client,
    tick_url: String,
    settings: SettingsHandle,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = TICK_INTERVAL.as_secs(),
        url = %tick_url,
        "Video task ticker started"
    );

    let mut interval = tokio::time::interval(TICK_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Video task ticker stopping");
                break;
            }
            _ = interval.tick() => {
                if settings.snapshot().booth_mode != BoothMode::Video {
                    continue;
                }
                if let Some(report) = poll_once(&http, &tick_url).await {
                    if report.processed > 0 || report.started > 0 {
                        tracing::info!(
                            processed = report.processed,
                            started = report.started,
                            "Video tick report"
                        );
                    }
                }
            }
        }
    }
}

/// Issue one poll.
///
/// Returns the report only for a success response explicitly marked as
/// JSON that parses into the expected envelope. Everything else —
/// network errors, error statuses, other content types, malformed
/// bodies — yields `None`.
pub async fn poll_once(http: &reqwest::Client, url: &str) -> Option<TickReport> {
    let response = match http.get(url).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(error = %err, "Tick poll failed");
            return None;
        }
    };

    let success = response.status().is_success();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = response.text().await.unwrap_or_default();

    interpret(success, &content_type, &body)
}

/// Decide whether a poll response carries a report.
fn interpret(success: bool, content_type: &str, body: &str) -> Option<TickReport> {
    if !success || !content_type.contains("application/json") {
        return None;
    }
    serde_json::from_str::<TickEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.report)
}
