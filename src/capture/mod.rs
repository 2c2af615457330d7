//! Capture source abstraction.
//!
//! A capture source is whatever actually produces the photo: an external
//! camera program, a file import, or a scripted mock. The caller allocates
//! the destination file, hands it to [`CaptureSource::start`], and awaits
//! the returned [`CaptureTicket`] for the outcome.

mod command;
mod import;
pub mod mock;

pub use command::CommandCapture;
pub use import::ImportCapture;

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{Result, SnapError};
use crate::media::ImageRef;

/// How a capture request ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "path", rename_all = "snake_case")]
pub enum CaptureOutcome {
    /// The destination file now holds an image.
    Captured(ImageRef),
    /// The source finished without producing an image.
    Cancelled,
}

/// Sending half of a capture result channel.
#[derive(Debug)]
pub struct CaptureCompleter {
    tx: oneshot::Sender<Result<CaptureOutcome>>,
}

impl CaptureCompleter {
    /// Deliver the final result. A ticket that was already dropped is ignored.
    pub fn complete(self, result: Result<CaptureOutcome>) {
        if self.tx.send(result).is_err() {
            debug!("Capture ticket dropped before completion");
        }
    }

    pub fn captured(self, image: ImageRef) {
        self.complete(Ok(CaptureOutcome::Captured(image)));
    }

    pub fn cancelled(self) {
        self.complete(Ok(CaptureOutcome::Cancelled));
    }
}

/// Receiving half of a capture result channel.
#[derive(Debug)]
pub struct CaptureTicket {
    rx: oneshot::Receiver<Result<CaptureOutcome>>,
}

impl CaptureTicket {
    /// A linked completer/ticket pair.
    pub fn channel() -> (CaptureCompleter, Self) {
        let (tx, rx) = oneshot::channel();
        (CaptureCompleter { tx }, Self { rx })
    }

    /// A ticket that is already resolved.
    pub fn ready(result: Result<CaptureOutcome>) -> Self {
        let (completer, ticket) = Self::channel();
        completer.complete(result);
        ticket
    }

    /// Wait for the outcome.
    ///
    /// A source that drops its completer without answering counts as
    /// [`CaptureOutcome::Cancelled`].
    pub async fn wait(self) -> Result<CaptureOutcome> {
        if let Ok(result) = self.rx.await {
            result
        } else {
            warn!("Capture source went away without a result");
            Ok(CaptureOutcome::Cancelled)
        }
    }
}

/// Something that can fill a destination file with a photo.
pub trait CaptureSource: Send + Sync {
    /// Short name for logs and output.
    fn name(&self) -> &str;

    /// Whether a capture can be attempted at all.
    fn is_available(&self) -> bool;

    /// Begin capturing into `destination`.
    ///
    /// Sources that do real work spawn onto the current tokio runtime.
    fn start(&self, destination: ImageRef) -> CaptureTicket;
}

/// Pick a capture source: an explicit import file wins over the configured command.
pub fn source_from_settings(
    settings: &Settings,
    import: Option<PathBuf>,
) -> Result<Box<dyn CaptureSource>> {
    if let Some(path) = import {
        return Ok(Box::new(ImportCapture::new(path)));
    }
    match &settings.capture.command {
        Some(cmd) => Ok(Box::new(CommandCapture::from_settings(cmd)?)),
        None => Err(SnapError::NoCaptureSource(
            "no capture command configured".to_string(),
        )),
    }
}
