//! Capture through an external camera program.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use super::{CaptureOutcome, CaptureSource, CaptureTicket};
use crate::config::CommandSettings;
use crate::error::{Result, SnapError};
use crate::media::ImageRef;

/// Placeholder replaced by the destination path in command arguments.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Runs a program such as `libcamera-still -o {output}` or
/// `fswebcam --no-banner {output}`.
///
/// A zero exit status with a non-empty destination file is a capture; a
/// non-zero status, an empty file, or a timeout is a cancellation.
#[derive(Debug, Clone)]
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandCapture {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_settings(settings: &CommandSettings) -> Result<Self> {
        if settings.program.trim().is_empty() {
            return Err(SnapError::ConfigInvalid(
                "capture.command.program is empty".to_string(),
            ));
        }
        let mut capture = Self::new(settings.program.clone(), settings.args.clone());
        if let Some(secs) = settings.timeout_secs.filter(|s| *s > 0) {
            capture = capture.with_timeout(Duration::from_secs(secs));
        }
        Ok(capture)
    }

    /// Arguments with the destination substituted.
    ///
    /// When no argument mentions the placeholder the destination is appended.
    pub fn render_args(&self, destination: &Path) -> Vec<String> {
        let dest = destination.display().to_string();
        let mut rendered: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(OUTPUT_PLACEHOLDER, &dest))
            .collect();
        if !self.args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER)) {
            rendered.push(dest);
        }
        rendered
    }

    #[instrument(skip(self), fields(program = %self.program, dest = %destination))]
    async fn run(&self, destination: ImageRef) -> Result<CaptureOutcome> {
        let args = self.render_args(destination.path());
        debug!(?args, "Spawning capture program");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SnapError::CaptureFailed(format!("failed to run {}: {e}", self.program)))?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(?limit, "Capture program timed out");
                    return Ok(CaptureOutcome::Cancelled);
                }
            },
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "Capture program failed");
            return Ok(CaptureOutcome::Cancelled);
        }

        let written = tokio::fs::metadata(destination.path())
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            warn!("Capture program exited cleanly but wrote nothing");
            return Ok(CaptureOutcome::Cancelled);
        }

        info!(bytes = written, "Capture program finished");
        Ok(CaptureOutcome::Captured(destination))
    }
}

impl CaptureSource for CommandCapture {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        find_program(&self.program).is_some()
    }

    fn start(&self, destination: ImageRef) -> CaptureTicket {
        let (completer, ticket) = CaptureTicket::channel();
        let this = self.clone();
        tokio::spawn(async move {
            completer.complete(this.run(destination).await);
        });
        ticket
    }
}

/// Locate `program` the way a shell would: paths are checked directly,
/// bare names are searched in `PATH`. Only executable files count.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
