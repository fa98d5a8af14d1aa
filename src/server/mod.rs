//! HTTP server: the JSON API plus the embedded browser dashboard.

mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use rust_embed::RustEmbed;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::concurrency::CheckGate;
use crate::config::Config;
use crate::heartbeat::{HeartbeatLedger, now_ms};
use crate::provider::{AlertChannel, TextGenerator, delivery, text};
use crate::welfare::{AlertLedger, WelfareCheck};

/// Dashboard assets compiled into the binary.
#[derive(RustEmbed)]
#[folder = "web/"]
struct DashboardAssets;

/// Shared handler state.
pub struct AppState {
    pub config: Config,
    pub heartbeats: HeartbeatLedger,
    pub alerts: AlertLedger,
    pub checker: WelfareCheck,
    pub gate: CheckGate,
    pub started_ms: u64,
}

impl AppState {
    pub fn new(
        config: Config,
        generator: Arc<dyn TextGenerator>,
        channels: Vec<Arc<dyn AlertChannel>>,
    ) -> Arc<Self> {
        let checker = WelfareCheck::new(config.clone(), generator, channels);
        Arc::new(Self {
            config,
            heartbeats: HeartbeatLedger::default(),
            alerts: AlertLedger::default(),
            checker,
            gate: CheckGate::new(),
            started_ms: now_ms(),
        })
    }

    /// Wire up the providers named by the config.
    pub fn from_config(config: Config) -> Result<Arc<Self>> {
        let generator = text::build(&config.generator).context("failed to build text generator")?;
        let channels = delivery::build(&config);
        Ok(Self::new(config, generator, channels))
    }
}

/// The full application router. CORS stays wide open on the API, as the
/// phone automation and the dashboard may live on any origin.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/heartbeat", post(handlers::heartbeat))
        .route("/api/check-welfare", post(handlers::check_welfare))
        .route("/api/status", get(handlers::status))
        .fallback(dashboard_asset)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the embedded dashboard; unknown paths fall back to 404.
async fn dashboard_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    match DashboardAssets::get(path) {
        Some(asset) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref().to_string())], asset.data.into_owned())
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

/// Bind and run until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "GuardianSwitch listening");
    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}

// Re-exported for handler signatures.
pub(crate) type SharedState = State<Arc<AppState>>;
