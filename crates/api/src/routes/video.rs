//! Route definitions for video generation.
//!
//! ```text
//! POST /video/generate    generate_video
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/video/generate", post(video::generate_video))
}
