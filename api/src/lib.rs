/// Vidfetch API
///
/// HTTP surface over the downloader: format discovery, downloads,
/// and retrieval of finished files.
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use vidfetch_downloader::{DownloadLibrary, DownloadOrchestrator, FormatInspector, ToolRunner};

/// Shared application state for all API handlers.
pub struct AppState {
    pub inspector: FormatInspector,
    pub orchestrator: DownloadOrchestrator,
    pub library: DownloadLibrary,
}

impl AppState {
    /// Wire every component to the same runner and download directory.
    pub fn new(runner: Arc<dyn ToolRunner>, download_dir: impl Into<PathBuf>) -> Self {
        let download_dir = download_dir.into();
        Self {
            inspector: FormatInspector::new(runner.clone()),
            orchestrator: DownloadOrchestrator::new(runner, download_dir.clone()),
            library: DownloadLibrary::new(download_dir),
        }
    }
}

/// Build the router with CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/formats", post(routes::list_formats))
        .route("/api/download", post(routes::download))
        .route("/downloads/*filename", get(routes::serve_download))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
