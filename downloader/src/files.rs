/// File Server lookup: find a finished download by name, ignoring case.
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use vidfetch_shared::errors::{VidfetchError, VidfetchResult};

/// Final path component, splitting on both `/` and `\`.
///
/// `None` for empty names and for `.` / `..`.
pub fn base_name(path: &str) -> Option<&str> {
    path.rsplit(&['/', '\\'][..])
        .next()
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
}

/// The download directory as seen by the file endpoint.
#[derive(Debug, Clone)]
pub struct DownloadLibrary {
    dir: PathBuf,
}

impl DownloadLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a client-supplied (already percent-decoded) name to a stored file.
    ///
    /// Only the base component is used. Directory entries are scanned
    /// linearly and the first case-insensitive exact match wins.
    pub async fn locate(&self, requested: &str) -> VidfetchResult<PathBuf> {
        let name = base_name(requested).ok_or(VidfetchError::NotFound)?;
        let target = name.to_lowercase();

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Download directory {} is missing", self.dir.display());
                return Err(VidfetchError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            // Follows symlinks; dangling links are skipped.
            match tokio::fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => {}
                _ => continue,
            }
            let stored = entry.file_name();
            let Some(stored) = stored.to_str() else {
                continue;
            };
            if stored.to_lowercase() == target {
                debug!("Matched {:?} to stored file {:?}", name, stored);
                return Ok(entry.path());
            }
        }

        warn!(
            "File not found on disk: tried {:?} in {}",
            name,
            self.dir.display()
        );
        Err(VidfetchError::NotFound)
    }
}
