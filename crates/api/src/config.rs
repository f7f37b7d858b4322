use snapbooth_core::settings::{DEFAULT_IMAGE_MODEL, DEFAULT_VIDEO_MODEL};

/// Default ARK API deployment.
const DEFAULT_ARK_BASE_URL: &str = "https://ark.ap-southeast.bytepluses.com/api/v3";

/// Server configuration loaded from environment variables.
///
/// All fields except the Drive bridge URL have defaults suitable for
/// local development. In production, override via environment
/// variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// ARK API base URL, trailing slashes stripped.
    pub ark_base_url: String,
    /// ARK API key. May be empty (upstream calls will then fail), which
    /// is warned about at startup rather than fatal.
    pub ark_api_key: String,
    /// Base URL of the Apps-Script Drive bridge.
    pub drive_base_url: String,
    /// Poll URL of the external video-task queue; `None` disables the
    /// ticker.
    pub tick_url: Option<String>,
    /// Image model used when the synced settings do not name one.
    pub image_model: String,
    /// Video model used when neither the request nor the synced
    /// settings name one.
    pub video_model: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                        |
    /// |------------------------|------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                      |
    /// | `PORT`                 | `3000`                                         |
    /// | `ARK_BASE_URL`         | `https://ark.ap-southeast.bytepluses.com/api/v3` |
    /// | `ARK_API_KEY`          | *(empty, warns)*                               |
    /// | `APPS_SCRIPT_BASE_URL` | *(required)*                                   |
    /// | `TICK_URL`             | *(unset: ticker disabled)*                     |
    /// | `IMAGE_MODEL`          | `seedream-4-0-250828`                          |
    /// | `VIDEO_MODEL`          | `seedance-1-0-pro-fast-251015`                 |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let ark_base_url = std::env::var("ARK_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ARK_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let ark_api_key = std::env::var("ARK_API_KEY").unwrap_or_default();
        if ark_api_key.is_empty() {
            tracing::warn!("ARK_API_KEY is not set; generation requests will be rejected upstream");
        }

        let drive_base_url =
            std::env::var("APPS_SCRIPT_BASE_URL").expect("APPS_SCRIPT_BASE_URL must be set");

        let tick_url = std::env::var("TICK_URL").ok().filter(|v| !v.is_empty());

        let image_model =
            std::env::var("IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.into());
        let video_model =
            std::env::var("VIDEO_MODEL").unwrap_or_else(|_| DEFAULT_VIDEO_MODEL.into());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            ark_base_url,
            ark_api_key,
            drive_base_url,
            tick_url,
            image_model,
            video_model,
            request_timeout_secs,
        }
    }
}
