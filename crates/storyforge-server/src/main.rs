//! The process boundary the sync engine runs inside: a small static-file
//! host with exactly two dynamic endpoints.
//!
//! - `GET /health` — liveness probe, returns `ok`.
//! - `GET /config` — the client-side identity configuration: the
//!   identity backend's URL and its *public* key. Deliberately nothing
//!   else — a service credential must never travel through here.
//! - anything else — a file from the public directory, falling back to
//!   `index.html` so client-side routing keeps working.
//!
//! Configuration comes from the environment only: `PORT`,
//! `IDENTITY_URL`, `IDENTITY_PUBLIC_KEY`, `PUBLIC_DIR`. No flags.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tracing::{error, info, warn};

mod config;

use config::ServerConfig;

/// The public, client-safe identity configuration served at `/config`.
///
/// Fields are optional because the server starts (and serves static
/// files) even when the identity env vars are missing — the client gets
/// `null`s and shows its own diagnostic instead of the host 500ing.
#[derive(Debug, Clone, Serialize)]
struct ClientConfig {
    identity_url: Option<String>,
    identity_public_key: Option<String>,
}

struct AppState {
    client_config: ClientConfig,
    public_dir: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyforge_server=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    if config.identity_url.is_none() || config.identity_public_key.is_none() {
        // The server still serves static files; the client shows its
        // own diagnostic when /config comes back with nulls.
        error!("missing env vars: IDENTITY_URL / IDENTITY_PUBLIC_KEY");
    }

    let state = Arc::new(AppState {
        client_config: ClientConfig {
            identity_url: config.identity_url.clone(),
            identity_public_key: config.identity_public_key.clone(),
        },
        public_dir: config.public_dir.clone(),
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/config", get(client_config))
        .fallback(get(static_file))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "storyforge server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// The client-facing identity configuration. Public values only.
async fn client_config(State(state): State<Arc<AppState>>) -> Json<ClientConfig> {
    Json(state.client_config.clone())
}

/// Serves a file from the public directory.
///
/// Unknown paths fall back to `index.html` (client-side routing); a
/// missing public directory is a plain 404. Traversal segments are
/// rejected before the filesystem is touched.
async fn static_file(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(relative) = sanitize_path(uri.path()) else {
        warn!(path = uri.path(), "rejected static path");
        return StatusCode::NOT_FOUND.into_response();
    };

    let full = state.public_dir.join(&relative);
    match tokio::fs::read(&full).await {
        Ok(bytes) => file_response(&relative, bytes),
        Err(_) => {
            // Fall back to index.html for client-side routes.
            let index = state.public_dir.join("index.html");
            match tokio::fs::read(&index).await {
                Ok(bytes) => file_response("index.html", bytes),
                Err(_) => StatusCode::NOT_FOUND.into_response(),
            }
        }
    }
}

fn file_response(path: &str, bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, content_type_for(path))], bytes).into_response()
}

/// Maps a request path to a relative file path, or `None` if the path
/// tries to escape the public directory.
fn sanitize_path(path: &str) -> Option<String> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some("index.html".to_string());
    }
    // Reject dot-dot and absolute/backslash tricks outright. Allocating
    // a checked relative string is simpler than canonicalizing.
    let escapes = trimmed
        .split('/')
        .any(|segment| segment == ".." || segment.contains('\\'));
    if escapes { None } else { Some(trimmed.to_string()) }
}

/// Minimal extension → content-type map for the assets the app ships.
fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
