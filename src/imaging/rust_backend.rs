//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, GIF, WebP) | `image::load_from_memory` (format sniffed from content) |
//! | Identify | `image::ImageReader::with_guessed_format` + `into_dimensions` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3`, target from [`fit_within`] |
//! | Encode → JPEG | `JpegEncoder::new_with_quality` |
//! | Encode → PNG | `PngEncoder` with best compression |
//! | Encode → GIF, WebP | `DynamicImage::write_to` (WebP is lossless) |
//!
//! The output format follows the stored filename's extension, so a file keeps
//! the extension it was uploaded with.

use super::backend::{BackendError, Dimensions, Downscaled, ImageBackend};
use super::calculations::fit_within;
use super::params::{ImageKind, ResizeParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image from memory.
fn load_image(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(bytes)
        .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {e}")))
}

/// Encode `img` as `kind` at the given quality.
fn encode_image(img: &DynamicImage, kind: ImageKind, quality: u32) -> Result<Vec<u8>, BackendError> {
    let mut out = Cursor::new(Vec::new());
    let encoded = match kind {
        ImageKind::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100) as u8);
            rgb.write_with_encoder(encoder)
        }
        ImageKind::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive);
            img.write_with_encoder(encoder)
        }
        ImageKind::Gif => DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut out, ImageFormat::Gif),
        ImageKind::WebP => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut out, ImageFormat::WebP)
        }
    };
    encoded.map_err(|e| BackendError::ProcessingFailed(format!("{kind:?} encode failed: {e}")))?;
    Ok(out.into_inner())
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to read dimensions: {e}")))?;
        Ok(Dimensions { width, height })
    }

    fn downscale(&self, bytes: &[u8], params: &ResizeParams) -> Result<Downscaled, BackendError> {
        let img = load_image(bytes)?;
        let (width, height) = fit_within((img.width(), img.height()), params.bounds);
        let resized = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };
        let bytes = encode_image(&resized, params.kind, params.quality.value())?;
        Ok(Downscaled {
            bytes,
            dimensions: Dimensions { width, height },
        })
    }
}
