//! Route definitions for the notification badge feed.
//!
//! ```text
//! GET /notifications    list_notifications
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/notifications", get(notification::list_notifications))
}
