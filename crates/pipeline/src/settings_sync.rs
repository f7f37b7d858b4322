//! Shared booth settings handle and the periodic sync loop.
//!
//! Settings are read-only everywhere except here: the loop fetches the
//! global configuration and event list from the Drive bridge, merges
//! the active event in, and swaps the snapshot. A failed sync keeps the
//! previous snapshot.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use snapbooth_core::settings::BoothSettings;
use snapbooth_drive::{DriveClient, EventInfo};
use tokio_util::sync::CancellationToken;

/// How often booth settings are re-fetched from the bridge.
pub const SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Process-wide handle to the current booth settings snapshot.
#[derive(Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<BoothSettings>>,
}

impl SettingsHandle {
    pub fn new(initial: BoothSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> BoothSettings {
        self.inner.read().expect("settings lock poisoned").clone()
    }

    /// Swap in a new snapshot.
    pub fn replace(&self, settings: BoothSettings) {
        *self.inner.write().expect("settings lock poisoned") = settings;
    }
}

/// Run the settings sync loop: once at startup, then every
/// [`SYNC_INTERVAL`], until `cancel` is triggered.
pub async fn run(drive: Arc<DriveClient>, handle: SettingsHandle, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SYNC_INTERVAL.as_secs(),
        "Settings sync started"
    );

    let mut interval = tokio::time::interval(SYNC_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Settings sync stopping");
                break;
            }
            _ = interval.tick() => {
                sync_once(&drive, &handle).await;
            }
        }
    }
}

/// Fetch settings and events and swap the merged snapshot in.
///
/// Any failure is logged and leaves the current snapshot untouched.
pub async fn sync_once(drive: &DriveClient, handle: &SettingsHandle) {
    let envelope = match drive.fetch_settings().await {
        Ok(envelope) if envelope.ok => envelope,
        Ok(_) => {
            tracing::warn!("Settings sync: bridge refused the settings request");
            return;
        }
        Err(err) => {
            tracing::warn!(error = %err, "Settings sync: settings fetch failed");
            return;
        }
    };

    let mut settings = envelope.settings;

    match drive.fetch_events().await {
        Ok(events) => {
            if let Some(active) = events.into_iter().find(|e| e.is_active) {
                apply_event(&mut settings, active);
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "Settings sync: event fetch failed, keeping settings-only snapshot");
        }
    }

    handle.replace(settings);
    tracing::debug!("Booth settings synced");
}

/// Overlay the active event's metadata onto the settings snapshot.
fn apply_event(settings: &mut BoothSettings, event: EventInfo) {
    settings.event_name = event.name;
    settings.event_description = event.description;
    settings.active_event_id = event.id;
    if !event.folder_id.is_empty() {
        settings.folder_id = event.folder_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_replace() {
        let handle = SettingsHandle::default();
        assert!(handle.snapshot().event_name.is_empty());

        handle.replace(BoothSettings {
            event_name: "Gala".into(),
            ..Default::default()
        });
        assert_eq!(handle.snapshot().event_name, "Gala");
    }

    #[test]
    fn active_event_overrides_event_fields() {
        let mut settings = BoothSettings {
            event_name: "Old".into(),
            folder_id: "default-folder".into(),
            ..Default::default()
        };
        apply_event(
            &mut settings,
            EventInfo {
                id: "ev-7".into(),
                name: "Launch Party".into(),
                description: "Rooftop".into(),
                folder_id: "event-folder".into(),
                is_active: true,
            },
        );
        assert_eq!(settings.event_name, "Launch Party");
        assert_eq!(settings.active_event_id, "ev-7");
        assert_eq!(settings.folder_id, "event-folder");
    }

    #[test]
    fn event_without_folder_keeps_the_default() {
        let mut settings = BoothSettings {
            folder_id: "default-folder".into(),
            ..Default::default()
        };
        apply_event(
            &mut settings,
            EventInfo {
                id: "ev-8".into(),
                name: "Expo".into(),
                description: String::new(),
                folder_id: String::new(),
                is_active: true,
            },
        );
        assert_eq!(settings.folder_id, "default-folder");
    }
}
