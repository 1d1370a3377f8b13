/// Service configuration read from the environment.
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{VidfetchError, VidfetchResult};

pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_YTDLP_BIN: &str = "yt-dlp";
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 1800;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub download_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// Executable name on PATH, or an absolute path.
    pub ytdlp_bin: String,
    /// Upper bound for a single external tool invocation.
    pub tool_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            ytdlp_bin: DEFAULT_YTDLP_BIN.to_string(),
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> VidfetchResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Unset or empty variables fall back to defaults; malformed numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> VidfetchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("API_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| VidfetchError::Config(format!("API_PORT={:?}: {}", raw, e)))?,
            None => defaults.port,
        };

        let tool_timeout = match get("TOOL_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    VidfetchError::Config(format!("TOOL_TIMEOUT_SECS={:?}: {}", raw, e))
                })?;
                if secs == 0 {
                    return Err(VidfetchError::Config(
                        "TOOL_TIMEOUT_SECS must be greater than zero".into(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.tool_timeout,
        };

        Ok(Self {
            download_dir: get("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            host: get("API_HOST").unwrap_or(defaults.host),
            port,
            ytdlp_bin: get("YTDLP_BIN").unwrap_or(defaults.ytdlp_bin),
            tool_timeout,
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
