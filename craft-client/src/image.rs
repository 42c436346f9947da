//! Client-side image compression
//!
//! Item images are stored inline as JPEG data URIs, so uploads are shrunk
//! before they are attached to a draft.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use image::imageops::FilterType;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Supported input formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Largest accepted input (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Output width cap, aspect ratio preserved
pub const MAX_WIDTH: u32 = 800;

/// JPEG quality of the compressed output
pub const JPEG_QUALITY: u8 = 70;

const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("File too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported format '{0}'. Supported: png, jpg, jpeg, webp")]
    UnsupportedFormat(String),

    #[error("Invalid image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to compress image: {0}")]
    Encode(#[source] image::ImageError),
}

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        let code = match err {
            ImageError::TooLarge { .. } => ErrorCode::ImageTooLarge,
            ImageError::UnsupportedFormat(_) => ErrorCode::ImageUnsupportedFormat,
            ImageError::Decode(_) | ImageError::Encode(_) => ErrorCode::ImageInvalid,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Check a file extension against [`SUPPORTED_FORMATS`]
pub fn check_extension(ext: &str) -> Result<(), ImageError> {
    let ext = ext.to_lowercase();
    if SUPPORTED_FORMATS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ImageError::UnsupportedFormat(ext))
    }
}

/// Compress raw image bytes into a JPEG data URI.
///
/// Images wider than [`MAX_WIDTH`] are scaled down; smaller images keep
/// their size.
pub fn compress_image(data: &[u8]) -> Result<String, ImageError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let format = image::guess_format(data).map_err(ImageError::Decode)?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) {
        return Err(ImageError::UnsupportedFormat(
            format.extensions_str().first().copied().unwrap_or("unknown").to_string(),
        ));
    }
    let img = image::load_from_memory_with_format(data, format).map_err(ImageError::Decode)?;
    let img = if img.width() > MAX_WIDTH {
        let height = scaled_height(img.width(), img.height(), MAX_WIDTH);
        img.resize_exact(MAX_WIDTH, height, FilterType::Triangle)
    } else {
        img
    };

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(ImageError::Encode)?;
    }

    tracing::debug!(
        input = data.len(),
        output = buffer.len(),
        width = img.width(),
        height = img.height(),
        "Image compressed"
    );
    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(&buffer)))
}

fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = (u64::from(height) * u64::from(target_width)) / u64::from(width.max(1));
    (scaled as u32).max(1)
}
