/// Format Inspector: title and downloadable formats for a URL.
use std::sync::Arc;
use tracing::{info, warn};

use vidfetch_shared::errors::{ToolOperation, VidfetchError, VidfetchResult};
use vidfetch_shared::models::InspectionResult;

use crate::formats::parse_format_listing;
use crate::runner::ToolRunner;

/// `yt-dlp --list-formats` arguments.
pub fn list_formats_args(url: &str) -> Vec<String> {
    vec![
        "--list-formats".to_string(),
        "--restrict-filenames".to_string(),
        "--no-warnings".to_string(),
        "--".to_string(),
        url.to_string(),
    ]
}

/// `yt-dlp --print %(title)s` arguments.
pub fn title_args(url: &str) -> Vec<String> {
    vec![
        "--print".to_string(),
        "%(title)s".to_string(),
        "--skip-download".to_string(),
        "--".to_string(),
        url.to_string(),
    ]
}

pub struct FormatInspector {
    runner: Arc<dyn ToolRunner>,
}

impl FormatInspector {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    /// List formats, then fetch the title with a second independent call.
    ///
    /// An empty parse result is `NoUsableFormats`, never an empty success.
    pub async fn inspect(&self, url: &str) -> VidfetchResult<InspectionResult> {
        let listing = self
            .runner
            .run(ToolOperation::Inspect, &list_formats_args(url))
            .await?;

        let title = self
            .runner
            .run(ToolOperation::Inspect, &title_args(url))
            .await?
            .trim()
            .to_string();

        let formats = parse_format_listing(&listing);
        if formats.is_empty() {
            warn!(
                "No usable formats parsed for {} ({} listing lines)",
                url,
                listing.lines().count()
            );
            return Err(VidfetchError::NoUsableFormats);
        }

        info!("Inspected {}: title={:?} formats={}", url, title, formats.len());
        Ok(InspectionResult { title, formats })
    }
}
