/// Unified error types for the Vidfetch service.
use thiserror::Error;

/// Which external tool call failed. Selects the client-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOperation {
    /// `--list-formats` or `--print %(title)s`.
    Inspect,
    /// The actual fetch with `-f <format_id>`.
    Download,
    /// `--version` probe at startup.
    Probe,
}

/// Top-level error type for Vidfetch operations.
#[derive(Debug, Error)]
pub enum VidfetchError {
    #[error("{0}")]
    MissingField(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{program} executable not found. Please ensure {program} is installed and on PATH.")]
    ToolNotFound { program: String },

    #[error("{}", external_tool_message(.operation, .detail))]
    ExternalTool {
        operation: ToolOperation,
        exit_code: Option<i32>,
        /// Last non-empty line of the tool's stderr.
        detail: String,
    },

    #[error("No usable formats found. Video may be private, age-restricted, or unsupported.")]
    NoUsableFormats,

    #[error("Download successful, but final filename could not be determined.")]
    UndeterminedFilename,

    #[error("File not found on server.")]
    NotFound,

    #[error("External tool timed out after {0}s")]
    Timeout(u64),

    #[error("Output name resolves outside the download directory.")]
    OutsideDownloadDir,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn external_tool_message(operation: &ToolOperation, detail: &str) -> String {
    match operation {
        ToolOperation::Inspect => format!("Failed to fetch video information. {}", detail),
        ToolOperation::Download => format!(
            "Download failed. The site may be blocking access or the video is restricted. Details: {}",
            detail
        ),
        ToolOperation::Probe => format!("Tool version check failed. {}", detail),
    }
}

/// Coarse classification used at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    NotFound,
    Internal,
}

impl VidfetchError {
    /// Classify this error for status-code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VidfetchError::MissingField(_)
            | VidfetchError::InvalidBody(_)
            | VidfetchError::OutsideDownloadDir => ErrorKind::ClientInput,
            VidfetchError::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

/// Result type alias for Vidfetch operations.
pub type VidfetchResult<T> = Result<T, VidfetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_tool_message_per_operation() {
        let inspect = VidfetchError::ExternalTool {
            operation: ToolOperation::Inspect,
            exit_code: Some(1),
            detail: "ERROR: Video unavailable".into(),
        };
        assert_eq!(
            inspect.to_string(),
            "Failed to fetch video information. ERROR: Video unavailable"
        );

        let download = VidfetchError::ExternalTool {
            operation: ToolOperation::Download,
            exit_code: Some(1),
            detail: "ERROR: HTTP Error 403".into(),
        };
        assert!(download.to_string().ends_with("Details: ERROR: HTTP Error 403"));
    }

    #[test]
    fn test_tool_not_found_names_program() {
        let err = VidfetchError::ToolNotFound { program: "yt-dlp".into() };
        assert!(err.to_string().starts_with("yt-dlp executable not found."));
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(VidfetchError::MissingField("x").kind(), ErrorKind::ClientInput);
        assert_eq!(VidfetchError::OutsideDownloadDir.kind(), ErrorKind::ClientInput);
        assert_eq!(
            VidfetchError::InvalidBody("expected a string".into()).kind(),
            ErrorKind::ClientInput
        );
        assert_eq!(VidfetchError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(VidfetchError::NoUsableFormats.kind(), ErrorKind::Internal);
        assert_eq!(VidfetchError::Timeout(5).kind(), ErrorKind::Internal);
        assert_eq!(VidfetchError::UndeterminedFilename.kind(), ErrorKind::Internal);
    }
}
