/// External tool subprocess runner.
///
/// Spawns the configured `yt-dlp` executable with an argument list,
/// waits for it under a timeout, and maps its exit status to
/// `VidfetchError`. Stdout is returned as text on success.
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use vidfetch_shared::errors::{ToolOperation, VidfetchError, VidfetchResult};

/// Something that can run the media tool and hand back its stdout.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Program name used in log lines and error messages.
    fn program(&self) -> &str;

    /// Run the tool with `args`. `operation` selects error wording.
    async fn run(&self, operation: ToolOperation, args: &[String]) -> VidfetchResult<String>;
}

/// Runs the real executable via `tokio::process`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// `--version` output, trimmed.
    pub async fn version(&self) -> VidfetchResult<String> {
        let out = self
            .run(ToolOperation::Probe, &["--version".to_string()])
            .await?;
        Ok(out.trim().to_string())
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, operation: ToolOperation, args: &[String]) -> VidfetchResult<String> {
        debug!("Running {} {:?}", self.program, args);

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => VidfetchError::ToolNotFound {
                    program: self.program.clone(),
                },
                _ => VidfetchError::Io(e),
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "{} did not finish within {}s, killed",
                    self.program,
                    self.timeout.as_secs()
                );
                return Err(VidfetchError::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
            let detail = last_line(&stderr)
                .map(String::from)
                .unwrap_or_else(|| format!("{} exited with {}", self.program, output.status));
            return Err(VidfetchError::ExternalTool {
                operation,
                exit_code: output.status.code(),
                detail,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Last non-empty line of `text`, trimmed.
pub fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}
