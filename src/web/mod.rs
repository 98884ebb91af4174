//! # Web Adapter
//!
//! The axum-specific layer: routes, handlers and the listener loop.
//!
//! | Route                | Response                                   |
//! |----------------------|--------------------------------------------|
//! | `GET /?surah=N`      | chapter list, or chapter N's verses (HTML) |
//! | `GET /api/surah/{n}` | chapter N's view models (JSON)             |
//! | `GET /healthz`       | `ok`                                       |
//! | `GET /pages/*`       | scanned page images from `pages_dir`       |

pub mod render;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::ServeDir;

use crate::core::library::Library;
use crate::core::view_model::ViewModel;
use render::{RenderSettings, Selection, chapter_view_models, render_page};

pub use render::escape_html;

pub struct AppState {
    pub library: Library,
    pub render: RenderSettings,
}

type SharedState = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub addr: String,
    pub pages_dir: PathBuf,
    pub render: RenderSettings,
}

#[derive(Debug)]
pub enum WebError {
    Io(std::io::Error),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<std::io::Error> for WebError {
    fn from(value: std::io::Error) -> Self {
        WebError::Io(value)
    }
}

pub async fn serve(library: Library, config: WebConfig) -> Result<(), WebError> {
    let state = Arc::new(AppState {
        library,
        render: config.render.clone(),
    });
    let router = build_router(state, &config.pages_dir);
    info!(
        "Binding HTTP listener on {} (page images from {})",
        config.addr,
        config.pages_dir.display()
    );
    let listener = TcpListener::bind(&config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

pub fn build_router(state: SharedState, pages_dir: &Path) -> Router {
    Router::new()
        .route("/", get(viewer))
        .route("/api/surah/{number}", get(api_surah))
        .route("/healthz", get(health))
        .nest_service("/pages", ServeDir::new(pages_dir))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[derive(Debug, Deserialize)]
struct ViewerParams {
    surah: Option<String>,
}

async fn viewer(
    State(state): State<SharedState>,
    Query(params): Query<ViewerParams>,
) -> impl IntoResponse {
    let selection = Selection::parse(params.surah.as_deref());
    debug!("GET / surah={:?} -> {:?}", params.surah, selection);
    Html(render_page(&state.library, selection, &state.render))
}

async fn health() -> impl IntoResponse {
    "ok"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChapterPayload {
    pub chapter: i64,
    pub name: Option<String>,
    pub verses: Vec<ViewModel>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.message });
        (self.status, Json(payload)).into_response()
    }
}

async fn api_surah(
    State(state): State<SharedState>,
    UrlPath(raw): UrlPath<String>,
) -> Result<Json<ChapterPayload>, ApiError> {
    let chapter: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("chapter must be an integer, got {raw:?}")))?;
    let name = u32::try_from(chapter)
        .ok()
        .and_then(|c| state.library.store().get_chapter_name(c))
        .map(str::to_string);
    let verses = chapter_view_models(&state.library, chapter);
    debug!("GET /api/surah/{chapter} -> {} verses", verses.len());
    Ok(Json(ChapterPayload {
        chapter,
        name,
        verses,
    }))
}
