/// Vidfetch API Server
///
/// Local HTTP service for discovering media formats of a URL,
/// downloading a chosen format via yt-dlp, and serving the result.
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use vidfetch_api::{build_router, AppState};
use vidfetch_downloader::ProcessRunner;
use vidfetch_shared::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vidfetch_api=info,vidfetch_downloader=info,tower_http=info".into()
            }),
        )
        .init();

    // Config
    let config = ServiceConfig::from_env()?;

    std::fs::create_dir_all(&config.download_dir).with_context(|| {
        format!(
            "Failed to create download directory {}",
            config.download_dir.display()
        )
    })?;
    let download_dir = config
        .download_dir
        .canonicalize()
        .unwrap_or_else(|_| config.download_dir.clone());
    info!("Download directory: {}", download_dir.display());

    // External tool
    let runner = Arc::new(ProcessRunner::new(
        config.ytdlp_bin.clone(),
        config.tool_timeout,
    ));
    match runner.version().await {
        Ok(version) => info!("Using {} {}", config.ytdlp_bin, version),
        Err(e) => warn!("{} is not usable yet: {}", config.ytdlp_bin, e),
    }

    // App state
    let state = Arc::new(AppState::new(runner, download_dir));
    let app = build_router(state);

    // Bind
    let addr = config.bind_addr();
    info!("Vidfetch API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Vidfetch API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
