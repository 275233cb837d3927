//! Loading and saving images.
//!
//! ## Supported Formats
//!
//! - **Input**: PNG, JPEG, BMP, GIF and PNM (PPM / PGM), decoded by the
//!   `image` crate; always converted to RGBA8.
//! - **Output**: `.png` (lossless, alpha kept) and `.jpg` / `.jpeg`
//!   (quality 95, alpha dropped).

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use log::debug;

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, Result};

pub const JPEG_QUALITY: u8 = 95;

/// Wrap a buffer as an `image` crate RGBA image.
pub fn to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage> {
    let (width, height) = (buffer.width(), buffer.height());
    let expected = width * height * 4;
    let actual = buffer.as_raw().len();
    RgbaImage::from_raw(width as u32, height as u32, buffer.as_raw().to_vec())
        .ok_or(FilterError::BufferLength { expected, actual })
}

pub fn from_rgba_image(image: RgbaImage) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    PixelBuffer::from_raw(width as usize, height as usize, image.into_raw())
}

/// Decode an image file into an RGBA buffer.
pub fn load_image(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let rgba = image::open(path)?.into_rgba8();
    debug!(
        "load_image: {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    from_rgba_image(rgba)
}

/// Encode `buffer` to `path`, choosing the format from the extension.
///
/// Parent directories are created as needed.
pub fn save_image(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !matches!(extension.as_str(), "png" | "jpg" | "jpeg") {
        return Err(FilterError::UnsupportedFormat { extension });
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let rgba = to_rgba_image(buffer)?;
    if extension == "png" {
        rgba.save_with_format(path, image::ImageFormat::Png)?;
    } else {
        let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
        let writer = BufWriter::new(File::create(path)?);
        let mut encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
        encoder.encode_image(&rgb)?;
    }
    debug!("save_image: {}", path.display());
    Ok(())
}
