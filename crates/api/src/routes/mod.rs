pub mod capture;
pub mod health;
pub mod notification;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /captures              POST   submit a capture for background processing
/// /notifications         GET    list job status notifications
/// /video/generate        POST   start an async video generation task
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(capture::router())
        .merge(notification::router())
        .merge(video::router())
}
