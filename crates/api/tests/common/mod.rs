#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use snapbooth_api::config::ServerConfig;
use snapbooth_api::routes;
use snapbooth_api::state::AppState;
use snapbooth_ark::ArkClient;
use snapbooth_core::compositor::Compositor;
use snapbooth_drive::DriveClient;
use snapbooth_pipeline::orchestrator::{GenerationBackend, RemoteStore};
use snapbooth_pipeline::{NotificationCenter, Orchestrator, SettingsHandle};

/// Build a test `ServerConfig` pointing the upstream collaborators at
/// the given base URLs (usually local stubs).
pub fn test_config(ark_base: &str, drive_base: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ark_base_url: ark_base.trim_end_matches('/').to_string(),
        ark_api_key: "test-key".to_string(),
        drive_base_url: drive_base.to_string(),
        tick_url: None,
        image_model: "seedream-4-0-250828".to_string(),
        video_model: "seedance-1-0-pro-fast-251015".to_string(),
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(ark_base: &str, drive_base: &str) -> (Router, AppState) {
    let config = test_config(ark_base, drive_base);
    let http = reqwest::Client::new();

    let ark = Arc::new(ArkClient::new(
        http.clone(),
        config.ark_base_url.clone(),
        config.ark_api_key.clone(),
    ));
    let drive = Arc::new(DriveClient::new(http.clone(), config.drive_base_url.clone()));
    let settings = SettingsHandle::default();
    let notifications = NotificationCenter::new();

    let orchestrator = Orchestrator::new(
        Arc::clone(&ark) as Arc<dyn GenerationBackend>,
        Arc::clone(&drive) as Arc<dyn RemoteStore>,
        Arc::new(Compositor::new(http.clone())),
        notifications.clone(),
        settings.clone(),
        http,
        config.image_model.clone(),
    );

    let state = AppState {
        config: Arc::new(config),
        ark,
        drive,
        orchestrator,
        notifications,
        settings,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state.clone());

    (app, state)
}

/// Issue a GET request against the router.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body against the router.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Spawn a minimal HTTP/1.1 stub that answers every request with the
/// given status and body (JSON content type). Returns the base URL.
///
/// No mocking crate is involved: the stub reads a full request (headers
/// plus declared body) off the socket and writes one canned response.
pub async fn spawn_http_stub(status: u16, body: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let body = body.clone();
            tokio::spawn(async move {
                if read_request(&mut socket).await.is_err() {
                    return;
                }
                let reason = match status {
                    200 => "OK",
                    400 => "Bad Request",
                    500 => "Internal Server Error",
                    _ => "Unknown",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len(),
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

/// Read one HTTP request (headers and, if declared, the body) off the
/// socket so the client does not see a reset while still writing.
async fn read_request(socket: &mut tokio::net::TcpStream) -> std::io::Result<()> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(headers_end) = find_subslice(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..headers_end]);
            let content_length: usize = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse().ok())?
                })
                .unwrap_or(0);
            if buf.len() >= headers_end + 4 + content_length {
                return Ok(());
            }
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
