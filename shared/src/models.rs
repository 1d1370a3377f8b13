/// Data model shared across all Vidfetch crates.
use serde::{Deserialize, Serialize};

use crate::errors::{VidfetchError, VidfetchResult};

/// One downloadable stream as scraped from the tool's format listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatRecord {
    /// Opaque tool identifier, passed back verbatim to `-f`.
    pub format_id: String,
    /// Height label such as `720p`, or `Audio Only`.
    pub quality: String,
    pub ext: String,
    /// Size in megabytes, rounded to 2 decimals.
    pub filesize_mb: f64,
}

/// Title plus formats in the order the tool emitted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionResult {
    pub title: String,
    pub formats: Vec<FormatRecord>,
}

/// A validated request to fetch one format of a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
    pub output_name: Option<String>,
}

impl DownloadRequest {
    /// Build from optional client fields. Blank values count as missing.
    pub fn from_parts(
        url: Option<&str>,
        format_id: Option<&str>,
        output_name: Option<&str>,
    ) -> VidfetchResult<Self> {
        let url = non_blank(url);
        let format_id = non_blank(format_id);
        match (url, format_id) {
            (Some(url), Some(format_id)) => Ok(Self {
                url,
                format_id,
                output_name: output_name
                    .filter(|n| !n.is_empty())
                    .map(String::from),
            }),
            _ => Err(VidfetchError::MissingField("URL and format_id are required.")),
        }
    }
}

/// Trimmed value, or `None` when absent or whitespace-only.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record_serialization() {
        let record = FormatRecord {
            format_id: "22".into(),
            quality: "720p".into(),
            ext: "mp4".into(),
            filesize_mb: 10.5,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "format_id": "22",
                "quality": "720p",
                "ext": "mp4",
                "filesize_mb": 10.5
            })
        );
    }

    #[test]
    fn test_download_request_requires_url_and_format() {
        assert!(DownloadRequest::from_parts(Some("https://x"), Some("22"), None).is_ok());
        assert!(matches!(
            DownloadRequest::from_parts(None, Some("22"), None),
            Err(VidfetchError::MissingField(_))
        ));
        assert!(matches!(
            DownloadRequest::from_parts(Some("https://x"), Some("   "), None),
            Err(VidfetchError::MissingField(_))
        ));
    }

    #[test]
    fn test_download_request_drops_empty_output_name() {
        let req = DownloadRequest::from_parts(Some(" https://x "), Some("22"), Some("")).unwrap();
        assert_eq!(req.url, "https://x");
        assert_eq!(req.output_name, None);
    }
}
