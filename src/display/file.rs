//! Surface that writes previews to an image file.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use super::DisplaySurface;
use crate::error::{Result, SnapError};
use crate::media::{DecodedImage, Dimensions};

/// Writes every shown image to `path`, in the format implied by its extension.
///
/// The file is written before the in-memory state changes, so a failed
/// write leaves both untouched.
#[derive(Debug)]
pub struct FilePreviewSurface {
    path: PathBuf,
    viewport: Dimensions,
    current: Option<DecodedImage>,
}

impl FilePreviewSurface {
    pub fn new(path: impl Into<PathBuf>, viewport: Dimensions) -> Self {
        Self {
            path: path.into(),
            viewport,
            current: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DisplaySurface for FilePreviewSurface {
    fn dimensions(&self) -> Dimensions {
        self.viewport
    }

    #[instrument(skip(self, image), fields(path = %self.path.display()))]
    fn show(&mut self, image: DecodedImage) -> Result<()> {
        image.pixels().save(&self.path).map_err(|e| SnapError::PreviewWrite {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!(size = %image.dimensions(), "Wrote preview");
        self.current = Some(image);
        Ok(())
    }

    fn current(&self) -> Option<&DecodedImage> {
        self.current.as_ref()
    }
}
