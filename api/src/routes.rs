/// API route handlers for Vidfetch.
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use vidfetch_shared::errors::{ErrorKind, VidfetchError};
use vidfetch_shared::models::{non_blank, DownloadRequest, InspectionResult};

use crate::AppState;

// ====== REQUEST / RESPONSE TYPES ======

#[derive(Deserialize)]
pub struct FormatsBody {
    pub url: Option<String>,
}

#[derive(Deserialize)]
pub struct DownloadBody {
    pub url: Option<String>,
    pub format_id: Option<String>,
    pub output_name: Option<String>,
}

#[derive(Serialize)]
pub struct DownloadResponse {
    pub filename: String,
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Log with context, then flatten to a status and a one-line message.
fn api_error(context: &str, err: VidfetchError) -> ApiError {
    let status = match err.kind() {
        ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("{} failed: {:?}", context, err);
    } else {
        warn!("{} rejected: {}", context, err);
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

/// Body that axum could not read as the expected JSON shape.
fn invalid_body(rejection: JsonRejection) -> VidfetchError {
    VidfetchError::InvalidBody(rejection.body_text())
}

// ====== FORMAT DISCOVERY ======

/// POST /api/formats
pub async fn list_formats(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FormatsBody>, JsonRejection>,
) -> Result<Json<InspectionResult>, ApiError> {
    let Json(body) = body.map_err(|e| api_error("formats", invalid_body(e)))?;
    let url = non_blank(body.url.as_deref())
        .ok_or_else(|| api_error("formats", VidfetchError::MissingField("URL not provided.")))?;

    let result = state
        .inspector
        .inspect(&url)
        .await
        .map_err(|e| api_error(&format!("formats for {}", url), e))?;

    Ok(Json(result))
}

// ====== DOWNLOAD ======

/// POST /api/download
pub async fn download(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DownloadBody>, JsonRejection>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let Json(body) = body.map_err(|e| api_error("download", invalid_body(e)))?;
    let request = DownloadRequest::from_parts(
        body.url.as_deref(),
        body.format_id.as_deref(),
        body.output_name.as_deref(),
    )
    .map_err(|e| api_error("download", e))?;

    let filename = state
        .orchestrator
        .download(&request)
        .await
        .map_err(|e| {
            api_error(
                &format!("download of {} (format {})", request.url, request.format_id),
                e,
            )
        })?;

    info!("Download ready: {}", filename);
    Ok(Json(DownloadResponse { filename }))
}

// ====== FILES ======

/// GET /downloads/*filename - Serve a finished download as an attachment
pub async fn serve_download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let path = state
        .library
        .locate(&filename)
        .await
        .map_err(|e| api_error(&format!("file lookup for {:?}", filename), e))?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| api_error(&format!("open {}", path.display()), e.into()))?;

    let stored = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type_for(stored).to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(stored)),
        ],
        body,
    ))
}

/// Guess a media type from the file extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "m4a" | "aac" => "audio/mp4",
        "opus" | "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// `attachment` disposition with an ASCII fallback and a UTF-8 `filename*`.
pub fn attachment_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}
