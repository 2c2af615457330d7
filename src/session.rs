//! Capture-then-preview workflow.
//!
//! [`CameraSession`] ties a [`PhotoStore`], a [`CaptureSource`], and a
//! [`DownsampleLoader`] together: allocate a file, capture into it, wait
//! for the result, and show a downsampled preview. Any failure leaves the
//! display surface as it was.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::capture::{CaptureOutcome, CaptureSource};
use crate::display::DisplaySurface;
use crate::error::{Result, SnapError};
use crate::loader::DownsampleLoader;
use crate::media::{DecodedSummary, ImageRef};
use crate::storage::PhotoStore;

/// Result of a successful capture and preview.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureReport {
    pub photo: ImageRef,
    pub preview: DecodedSummary,
}

/// One camera screen's worth of state.
pub struct CameraSession {
    store: PhotoStore,
    source: Arc<dyn CaptureSource>,
    loader: DownsampleLoader,
}

impl CameraSession {
    pub fn new(store: PhotoStore, source: Arc<dyn CaptureSource>) -> Self {
        Self {
            store,
            source,
            loader: DownsampleLoader::default(),
        }
    }

    #[must_use]
    pub fn with_loader(mut self, loader: DownsampleLoader) -> Self {
        self.loader = loader;
        self
    }

    pub const fn store(&self) -> &PhotoStore {
        &self.store
    }

    /// Capture a photo into a freshly allocated file.
    ///
    /// A cancelled or failed capture removes the allocated file, even if the
    /// source wrote part of it, and a cancel returns
    /// [`SnapError::CaptureCancelled`].
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn capture(&self) -> Result<ImageRef> {
        if !self.source.is_available() {
            return Err(SnapError::NoCaptureSource(format!(
                "capture source '{}' is not available",
                self.source.name()
            )));
        }

        let destination = self.store.create_image_file()?;
        let result = self.source.start(destination.clone()).wait().await;

        match result {
            Ok(CaptureOutcome::Captured(photo)) => {
                info!(path = %photo, "Photo captured");
                Ok(photo)
            }
            Ok(CaptureOutcome::Cancelled) => {
                self.discard_quietly(&destination);
                Err(SnapError::CaptureCancelled)
            }
            Err(e) => {
                self.discard_quietly(&destination);
                Err(e)
            }
        }
    }

    /// Load `photo` sized for `surface` and show it.
    ///
    /// Decoding runs on a blocking worker thread.
    #[instrument(skip(self, surface), fields(path = %photo))]
    pub async fn show<S: DisplaySurface + ?Sized>(
        &self,
        photo: &ImageRef,
        surface: &mut S,
    ) -> Result<DecodedSummary> {
        let target = surface.dimensions();
        let loader = self.loader.clone();
        let image = photo.clone();
        let decoded = tokio::task::spawn_blocking(move || loader.load(&image, target))
            .await
            .map_err(|e| SnapError::Other(format!("decode task failed: {e}")))??;

        let summary = DecodedSummary::from(&decoded);
        surface.show(decoded)?;
        Ok(summary)
    }

    /// Capture a photo and show it on `surface`.
    ///
    /// If capture succeeds but the preview fails, the photo stays on disk
    /// and the preview error is returned.
    pub async fn take_picture<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
    ) -> Result<CaptureReport> {
        let photo = self.capture().await?;
        let preview = self.show(&photo, surface).await?;
        Ok(CaptureReport { photo, preview })
    }

    fn discard_quietly(&self, image: &ImageRef) {
        if let Err(e) = self.store.discard(image) {
            warn!(path = %image, error = %e, "Failed to remove unused photo file");
        }
    }
}
