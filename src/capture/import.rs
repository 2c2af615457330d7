//! Capture by importing an existing image file.

use std::path::PathBuf;

use tracing::{info, instrument};

use super::{CaptureOutcome, CaptureSource, CaptureTicket};
use crate::error::{Result, SnapError};
use crate::media::ImageRef;

/// Copies a file the user already has into the photo store.
#[derive(Debug, Clone)]
pub struct ImportCapture {
    source: PathBuf,
}

impl ImportCapture {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    #[instrument(skip(self), fields(from = %self.source.display(), to = %destination))]
    async fn run(&self, destination: ImageRef) -> Result<CaptureOutcome> {
        let bytes = tokio::fs::copy(&self.source, destination.path())
            .await
            .map_err(|e| {
                SnapError::CaptureFailed(format!(
                    "cannot import {}: {e}",
                    self.source.display()
                ))
            })?;
        if bytes == 0 {
            return Ok(CaptureOutcome::Cancelled);
        }
        info!(bytes, "Imported photo");
        Ok(CaptureOutcome::Captured(destination))
    }
}

impl CaptureSource for ImportCapture {
    fn name(&self) -> &str {
        "import"
    }

    fn is_available(&self) -> bool {
        self.source.is_file()
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
