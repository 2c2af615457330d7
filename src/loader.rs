//! Downsampled image loading for previews.
//!
//! A captured photo is usually far larger than the area it is shown in.
//! [`DownsampleLoader`] probes the header first, picks an integer sample
//! factor from the natural and target sizes, then decodes once at that
//! factor.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::error::{Result, SnapError};
use crate::media::{DecodedImage, Dimensions, ImageCodec, ImageRef, StdCodec};

/// Integer sample factor for showing `photo` inside `target`.
///
/// `floor(min(photo.w / target.w, photo.h / target.h))`, never below 1, so
/// images are never upscaled.
///
/// # Errors
///
/// Returns [`SnapError::DisplayNotReady`] when either target side is zero.
pub fn scale_factor(photo: Dimensions, target: Dimensions) -> Result<u32> {
    if target.is_empty() {
        return Err(SnapError::DisplayNotReady {
            width: target.width,
            height: target.height,
        });
    }
    let by_width = photo.width / target.width;
    let by_height = photo.height / target.height;
    Ok(by_width.min(by_height).max(1))
}

/// Loads images at a resolution suited to a display area.
#[derive(Clone)]
pub struct DownsampleLoader {
    codec: Arc<dyn ImageCodec>,
}

impl Default for DownsampleLoader {
    fn default() -> Self {
        Self::new(Arc::new(StdCodec))
    }
}

impl std::fmt::Debug for DownsampleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownsampleLoader").finish_non_exhaustive()
    }
}

impl DownsampleLoader {
    pub fn new(codec: Arc<dyn ImageCodec>) -> Self {
        Self { codec }
    }

    /// Natural size of `image`, from its header only.
    pub fn probe(&self, image: &ImageRef) -> Result<Dimensions> {
        self.codec.probe_dimensions(image)
    }

    /// Decode `image` for display in `target`.
    ///
    /// The target is checked before the file is touched, so an unlaid-out
    /// display fails fast with [`SnapError::DisplayNotReady`].
    #[instrument(skip(self), fields(path = %image, %target))]
    pub fn load(&self, image: &ImageRef, target: Dimensions) -> Result<DecodedImage> {
        if target.is_empty() {
            return Err(SnapError::DisplayNotReady {
                width: target.width,
                height: target.height,
            });
        }

        let natural = self.codec.probe_dimensions(image)?;
        let factor = scale_factor(natural, target)?;
        debug!(%natural, factor, "Chose sample factor");

        let decoded = self.codec.decode_subsampled(image, factor)?;
        if !decoded.dimensions().fits_within(natural) {
            return Err(SnapError::decode(
                image,
                format!(
                    "decoder produced {} for a {natural} source",
                    decoded.dimensions()
                ),
            ));
        }

        info!(
            natural = %natural,
            decoded = %decoded.dimensions(),
            factor,
            pixels = decoded.dimensions().pixel_count(),
            "Loaded preview"
        );
        Ok(decoded)
    }
}
