//! Handler for the notification badge feed.

use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/notifications
///
/// List current job notifications, newest first, capped at the
/// registry capacity.
pub async fn list_notifications(State(state): State<AppState>) -> Json<serde_json::Value> {
    let notifications = state.notifications.list();
    Json(serde_json::json!({ "data": notifications }))
}
