//! Image data model shared by capture, loading, and display.
//!
//! - [`ImageRef`]: handle to a stored photo file
//! - [`Dimensions`]: width/height pair for images and viewports
//! - [`DecodedImage`]: pixels decoded at a chosen resolution
//! - [`codec`]: the two-step probe/decode abstraction

pub mod codec;

pub use codec::{ImageCodec, StdCodec};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::SnapError;

/// Handle to a captured image on persistent storage.
///
/// Created once when the destination file is allocated and only read after
/// that. Clones share the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    path: Arc<Path>,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::from(path.into().into_boxed_path()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Serialize for ImageRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.path.display())
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (nothing to draw into, or a degenerate image).
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when both sides are no larger than `other`'s.
    pub const fn fits_within(&self, other: Self) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = SnapError;

    /// Parses `WIDTHxHEIGHT` (`x` or `X`, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SnapError::InvalidDimensions {
            input: s.to_string(),
        };
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        Ok(Self { width, height })
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// An image decoded into memory at reduced resolution.
///
/// Owned by whichever display surface is showing it.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: RgbImage,
    source: ImageRef,
    natural: Dimensions,
    sample_factor: u32,
}

impl DecodedImage {
    pub fn new(pixels: RgbImage, source: ImageRef, natural: Dimensions, sample_factor: u32) -> Self {
        Self {
            pixels,
            source,
            natural,
            sample_factor,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    /// Full-resolution size of the source file.
    pub const fn natural_dimensions(&self) -> Dimensions {
        self.natural
    }

    pub const fn sample_factor(&self) -> u32 {
        self.sample_factor
    }

    pub const fn source(&self) -> &ImageRef {
        &self.source
    }

    pub const fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Summary of a decoded image for output.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedSummary {
    pub path: ImageRef,
    pub natural: Dimensions,
    pub decoded: Dimensions,
    pub sample_factor: u32,
}

impl From<&DecodedImage> for DecodedSummary {
    fn from(img: &DecodedImage) -> Self {
        Self {
            path: img.source.clone(),
            natural: img.natural,
            decoded: img.dimensions(),
            sample_factor: img.sample_factor,
        }
    }
}
