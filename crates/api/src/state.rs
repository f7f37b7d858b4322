use std::sync::Arc;

use snapbooth_ark::ArkClient;
use snapbooth_drive::DriveClient;
use snapbooth_pipeline::{NotificationCenter, Orchestrator, SettingsHandle};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// ARK generation client (video task submission).
    pub ark: Arc<ArkClient>,
    /// Drive bridge client (queue registration).
    pub drive: Arc<DriveClient>,
    /// Background job orchestrator.
    pub orchestrator: Orchestrator,
    /// Job status registry surfaced at `/api/notifications`.
    pub notifications: NotificationCenter,
    /// Synced booth settings snapshot handle.
    pub settings: SettingsHandle,
}
