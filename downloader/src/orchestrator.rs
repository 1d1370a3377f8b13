/// Download Orchestrator: fetch one format of a URL into the download directory.
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use vidfetch_shared::errors::{ToolOperation, VidfetchError, VidfetchResult};
use vidfetch_shared::models::DownloadRequest;

use crate::files::base_name;
use crate::runner::{last_line, ToolRunner};

/// Characters removed from user-supplied output names.
pub const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

const TITLE_TEMPLATE: &str = "%(title)s";
const EXT_SUFFIX: &str = ".%(ext)s";

/// Strip filesystem-unsafe characters, keeping everything else in order.
pub fn sanitize_output_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !FORBIDDEN_NAME_CHARS.contains(c))
        .collect()
}

/// `yt-dlp` fetch arguments. `after_move` prints the path after merging.
pub fn fetch_args(url: &str, format_id: &str, template: &Path) -> Vec<String> {
    vec![
        "-f".to_string(),
        format_id.to_string(),
        "--output".to_string(),
        template.to_string_lossy().into_owned(),
        "--print".to_string(),
        "after_move:%(filepath)s".to_string(),
        "--".to_string(),
        url.to_string(),
    ]
}

/// Join `file_name` onto `dir`, requiring exactly one normal component below it.
///
/// Sanitized names never contain separators, so this only rejects input
/// that bypassed `sanitize_output_name`.
pub fn confine_to_dir(dir: &Path, file_name: &str) -> VidfetchResult<PathBuf> {
    let path = dir.join(file_name);
    let relative = path
        .strip_prefix(dir)
        .map_err(|_| VidfetchError::OutsideDownloadDir)?;
    let mut components = relative.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(VidfetchError::OutsideDownloadDir),
    }
}

pub struct DownloadOrchestrator {
    runner: Arc<dyn ToolRunner>,
    download_dir: PathBuf,
}

impl DownloadOrchestrator {
    /// `download_dir` should already exist; it is canonicalized when possible.
    pub fn new(runner: Arc<dyn ToolRunner>, download_dir: impl Into<PathBuf>) -> Self {
        let download_dir = download_dir.into();
        let download_dir = download_dir.canonicalize().unwrap_or(download_dir);
        Self {
            runner,
            download_dir,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Output template for the tool, confined to the download directory.
    ///
    /// A name that sanitizes to nothing falls back to the title template.
    /// `%` in a custom name is doubled so the tool writes it literally.
    pub fn output_template(&self, output_name: Option<&str>) -> VidfetchResult<PathBuf> {
        let stem = output_name
            .map(sanitize_output_name)
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.replace('%', "%%"))
            .unwrap_or_else(|| TITLE_TEMPLATE.to_string());

        confine_to_dir(&self.download_dir, &format!("{}{}", stem, EXT_SUFFIX))
    }

    /// Run the download and return the base filename the tool reported.
    pub async fn download(&self, req: &DownloadRequest) -> VidfetchResult<String> {
        let template = self.output_template(req.output_name.as_deref())?;
        info!(
            "Downloading {} format={} template={}",
            req.url,
            req.format_id,
            template.display()
        );

        let stdout = self
            .runner
            .run(
                ToolOperation::Download,
                &fetch_args(&req.url, &req.format_id, &template),
            )
            .await?;

        let final_path = match last_line(&stdout) {
            Some(path) => path,
            None => {
                warn!("{} printed no final path for {}", self.runner.program(), req.url);
                return Err(VidfetchError::UndeterminedFilename);
            }
        };

        let filename = base_name(final_path).ok_or(VidfetchError::UndeterminedFilename)?;
        info!("Download finished: {}", final_path);
        Ok(filename.to_string())
    }
}
