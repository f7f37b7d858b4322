//! Route definitions for capture submission.
//!
//! ```text
//! POST /captures    submit_capture
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::capture;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/captures", post(capture::submit_capture))
}
