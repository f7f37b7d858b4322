use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapbooth_api::config::ServerConfig;
use snapbooth_api::{routes, state};
use snapbooth_ark::ArkClient;
use snapbooth_core::compositor::Compositor;
use snapbooth_drive::DriveClient;
use snapbooth_pipeline::orchestrator::{GenerationBackend, RemoteStore};
use snapbooth_pipeline::{
    settings_sync, ticker, NotificationCenter, Orchestrator, SettingsHandle,
};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapbooth_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Shared HTTP client and collaborators ---
    let http = reqwest::Client::new();
    let ark = Arc::new(ArkClient::new(
        http.clone(),
        config.ark_base_url.clone(),
        config.ark_api_key.clone(),
    ));
    let drive = Arc::new(DriveClient::new(http.clone(), config.drive_base_url.clone()));

    // --- Booth settings (initial sync, then periodic refresh) ---
    let settings = SettingsHandle::default();
    settings_sync::sync_once(&drive, &settings).await;
    tracing::info!("Initial settings sync finished");

    let sync_cancel = tokio_util::sync::CancellationToken::new();
    let sync_handle = tokio::spawn(settings_sync::run(
        Arc::clone(&drive),
        settings.clone(),
        sync_cancel.clone(),
    ));

    // --- Notifications and orchestrator ---
    let notifications = NotificationCenter::new();
    let orchestrator = Orchestrator::new(
        Arc::clone(&ark) as Arc<dyn GenerationBackend>,
        Arc::clone(&drive) as Arc<dyn RemoteStore>,
        Arc::new(Compositor::new(http.clone())),
        notifications.clone(),
        settings.clone(),
        http.clone(),
        config.image_model.clone(),
    );

    // --- Video task ticker ---
    let ticker_cancel = tokio_util::sync::CancellationToken::new();
    let ticker_handle = config.tick_url.clone().map(|tick_url| {
        tokio::spawn(ticker::run(
            http.clone(),
            tick_url,
            settings.clone(),
            ticker_cancel.clone(),
        ))
    });
    if ticker_handle.is_none() {
        tracing::info!("TICK_URL not set, video task ticker disabled");
    }

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        ark,
        drive,
        orchestrator,
        notifications,
        settings,
    };

    // --- CORS ---
    // The kiosk frontend may be served from anywhere (file://, a CDN,
    // a LAN host), so the API is deliberately permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let app = Router::new()
        // Health check at root level (not under /api).
        .merge(routes::health::router())
        // API routes.
        .nest("/api", routes::api_routes())
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500 JSON.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // CORS.
        .layer(cors)
        // Shared state.
        .with_state(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    // Jobs already running keep their in-flight generation and upload
    // calls; only the periodic loops are stopped.
    tracing::info!("Server stopped accepting connections, cleaning up");

    ticker_cancel.cancel();
    if let Some(handle) = ticker_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Video task ticker stopped");

    sync_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sync_handle).await;
    tracing::info!("Settings sync stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
