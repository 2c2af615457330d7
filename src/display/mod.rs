//! Display surfaces for decoded previews.
//!
//! A surface reports the size it can draw into and keeps whatever it is
//! currently showing. A failed [`DisplaySurface::show`] must leave the
//! previous image in place.

mod file;

pub use file::FilePreviewSurface;

use tracing::debug;

use crate::error::Result;
use crate::media::{DecodedImage, Dimensions};

/// Something that renders decoded images.
pub trait DisplaySurface {
    /// Current drawable size. Zero on either side means "not laid out".
    fn dimensions(&self) -> Dimensions;

    /// Replace the displayed image.
    ///
    /// # Errors
    ///
    /// On error the previously shown image is unchanged.
    fn show(&mut self, image: DecodedImage) -> Result<()>;

    /// The image currently shown, if any.
    fn current(&self) -> Option<&DecodedImage>;
}

/// Surface that keeps the image in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    viewport: Dimensions,
    current: Option<DecodedImage>,
}

impl MemorySurface {
    pub fn new(viewport: Dimensions) -> Self {
        Self {
            viewport,
            current: None,
        }
    }

    /// Change the viewport, e.g. after layout.
    pub fn resize(&mut self, viewport: Dimensions) {
        debug!(%viewport, "Surface resized");
        self.viewport = viewport;
    }

    /// Drop the shown image.
    pub fn clear(&mut self) -> Option<DecodedImage> {
        self.current.take()
    }
}

impl DisplaySurface for MemorySurface {
    fn dimensions(&self) -> Dimensions {
        self.viewport
    }

    fn show(&mut self, image: DecodedImage) -> Result<()> {
        debug!(size = %image.dimensions(), source = %image.source(), "Showing image");
        self.current = Some(image);
        Ok(())
    }

    fn current(&self) -> Option<&DecodedImage> {
        self.current.as_ref()
    }
}
