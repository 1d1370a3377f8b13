/// Vidfetch Downloader
///
/// Thin integration layer over the `yt-dlp` command-line tool:
/// format discovery, format-selected downloads, and lookup of
/// finished files in the download directory.
pub mod files;
pub mod formats;
pub mod inspector;
pub mod orchestrator;
pub mod runner;

pub use files::DownloadLibrary;
pub use inspector::FormatInspector;
pub use orchestrator::DownloadOrchestrator;
pub use runner::{ProcessRunner, ToolRunner};

#[cfg(test)]
pub(crate) mod testing;
