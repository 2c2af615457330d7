//! Two-step image codec abstraction.
//!
//! Loading a preview is split into a header probe and a subsampled decode so
//! the loader can choose a sample factor before any pixels are produced.
//!
//! JPEG input is scaled inside the decoder (1/2, 1/4 or 1/8 in the DCT
//! domain), so the full-resolution buffer is never allocated. Other formats
//! decode at full size and are subsampled afterwards.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Pixel, RgbImage};
use jpeg_decoder::PixelFormat;
use tracing::{debug, instrument, trace};

use super::{DecodedImage, Dimensions, ImageRef};
use crate::error::{Result, SnapError};

/// Decoder operations the loader depends on.
pub trait ImageCodec: Send + Sync {
    /// Read the natural size of the image without decoding pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::Decode`] if the file is missing, unreadable, or
    /// reports a zero-sized image.
    fn probe_dimensions(&self, image: &ImageRef) -> Result<Dimensions>;

    /// Decode keeping every `factor`-th pixel in each axis.
    ///
    /// The result is `ceil(w / factor) x ceil(h / factor)`. A factor of 0 is
    /// treated as 1.
    fn decode_subsampled(&self, image: &ImageRef, factor: u32) -> Result<DecodedImage>;
}

/// Codec backed by the `image` crate (JPEG, PNG, and the other enabled formats).
#[derive(Debug, Clone, Copy, Default)]
pub struct StdCodec;

impl StdCodec {
    fn open(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>> {
        ImageReader::open(path)
            .map_err(|e| SnapError::decode(path.display(), e))?
            .with_guessed_format()
            .map_err(|e| SnapError::decode(path.display(), e))
    }
}

impl ImageCodec for StdCodec {
    #[instrument(skip(self), fields(path = %image))]
    fn probe_dimensions(&self, image: &ImageRef) -> Result<Dimensions> {
        let reader = Self::open(image.path())?;
        trace!(format = ?reader.format(), "Probing header");
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| SnapError::decode(image, e))?;
        let dims = Dimensions::new(width, height);
        if dims.is_empty() {
            return Err(SnapError::decode(image, format!("degenerate size {dims}")));
        }
        debug!(%dims, "Probed image");
        Ok(dims)
    }

    #[instrument(skip(self), fields(path = %image))]
    fn decode_subsampled(&self, image: &ImageRef, factor: u32) -> Result<DecodedImage> {
        let factor = factor.max(1);
        let reader = Self::open(image.path())?;

        if reader.format() == Some(ImageFormat::Jpeg) {
            drop(reader);
            let reduced = decode_jpeg_reduced(image.path(), factor)?;
            let natural = reduced.natural;
            let pixels = finish_subsample(reduced.pixels, natural, factor, reduced.dct_scale);
            debug!(
                %natural,
                decoded = %Dimensions::new(pixels.width(), pixels.height()),
                factor,
                dct_scale = reduced.dct_scale,
                "Decoded JPEG"
            );
            return Ok(DecodedImage::new(pixels, image.clone(), natural, factor));
        }

        let decoded = reader.decode().map_err(|e| SnapError::decode(image, e))?;
        let natural = Dimensions::new(decoded.width(), decoded.height());
        if natural.is_empty() {
            return Err(SnapError::decode(image, format!("degenerate size {natural}")));
        }

        let pixels = subsample(decoded, factor);
        debug!(
            %natural,
            decoded = %Dimensions::new(pixels.width(), pixels.height()),
            factor,
            "Decoded image"
        );
        Ok(DecodedImage::new(pixels, image.clone(), natural, factor))
    }
}

/// A JPEG decoded at reduced size by the decoder itself.
#[derive(Debug, Clone)]
pub struct ReducedJpeg {
    /// Pixels as produced by the decoder, about `natural / dct_scale`.
    pub pixels: RgbImage,
    pub natural: Dimensions,
    /// 1, 2, 4 or 8.
    pub dct_scale: u32,
}

/// Largest DCT scale denominator the decoder supports that does not exceed `factor`.
pub const fn dct_scale_for(factor: u32) -> u16 {
    match factor {
        0..=1 => 1,
        2..=3 => 2,
        4..=7 => 4,
        _ => 8,
    }
}

/// Decode a JPEG, letting the decoder drop resolution by [`dct_scale_for`]`(factor)`.
///
/// The returned buffer is the only pixel allocation; its size is bounded by
/// the reduced dimensions, not the natural ones.
pub fn decode_jpeg_reduced(path: &Path, factor: u32) -> Result<ReducedJpeg> {
    let fail = |reason: &dyn std::fmt::Display| SnapError::decode(path.display(), reason);

    let file = File::open(path).map_err(|e| fail(&e))?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    decoder.read_info().map_err(|e| fail(&e))?;
    let info = decoder.info().ok_or_else(|| fail(&"missing JPEG header"))?;
    let natural = Dimensions::new(u32::from(info.width), u32::from(info.height));
    if natural.is_empty() {
        return Err(fail(&format!("degenerate size {natural}")));
    }

    let dct_scale = dct_scale_for(factor);
    let (width, height) = decoder
        .scale(info.width.div_ceil(dct_scale), info.height.div_ceil(dct_scale))
        .map_err(|e| fail(&e))?;
    trace!(dct_scale, width, height, "Decoder scaled");

    let data = decoder.decode().map_err(|e| fail(&e))?;
    let pixels = jpeg_to_rgb(data, u32::from(width), u32::from(height), info.pixel_format)
        .ok_or_else(|| fail(&"decoder returned a buffer of unexpected size"))?;

    Ok(ReducedJpeg {
        pixels,
        natural,
        dct_scale: u32::from(dct_scale),
    })
}

fn jpeg_to_rgb(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Option<RgbImage> {
    let rgb = match format {
        PixelFormat::RGB24 => data,
        PixelFormat::L8 => data.iter().flat_map(|&l| [l, l, l]).collect(),
        // Big-endian samples; keep the high byte.
        PixelFormat::L16 => data.chunks_exact(2).flat_map(|p| [p[0]; 3]).collect(),
        PixelFormat::CMYK32 => data
            .chunks_exact(4)
            .flat_map(|p| {
                let k = 255 - u32::from(p[3]);
                let channel = |c: u8| ((255 - u32::from(c)) * k / 255) as u8;
                [channel(p[0]), channel(p[1]), channel(p[2])]
            })
            .collect(),
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    RgbImage::from_raw(width, height, rgb)
}

/// Bring a decoder-reduced buffer down to the `ceil(natural / factor)` grid.
///
/// `scaled` is already `natural / dct_scale`; the remaining step keeps the
/// nearest pixel, so a `dct_scale` that divides `factor` is a plain stride.
pub fn finish_subsample(scaled: RgbImage, natural: Dimensions, factor: u32, dct_scale: u32) -> RgbImage {
    let factor = factor.max(1);
    let dct_scale = dct_scale.clamp(1, factor);
    let width = natural.width.div_ceil(factor);
    let height = natural.height.div_ceil(factor);
    if scaled.dimensions() == (width, height) {
        return scaled;
    }

    let max_x = scaled.width().saturating_sub(1);
    let max_y = scaled.height().saturating_sub(1);
    RgbImage::from_fn(width, height, |x, y| {
        let sx = (u64::from(x) * u64::from(factor) / u64::from(dct_scale)) as u32;
        let sy = (u64::from(y) * u64::from(factor) / u64::from(dct_scale)) as u32;
        *scaled.get_pixel(sx.min(max_x), sy.min(max_y))
    })
}

/// Nearest-neighbour subsample: keeps the pixel at `(x * factor, y * factor)`.
pub fn subsample(source: DynamicImage, factor: u32) -> RgbImage {
    if factor <= 1 {
        return source.into_rgb8();
    }
    let width = source.width().div_ceil(factor);
    let height = source.height().div_ceil(factor);
    RgbImage::from_fn(width, height, |x, y| {
        source.get_pixel(x * factor, y * factor).to_rgb()
    })
}
