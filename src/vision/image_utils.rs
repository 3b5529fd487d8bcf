// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading, validation and resizing for leaf photographs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// Custom error types for image processing
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image size exceeds maximum allowed size of {1} bytes (got {0} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Invalid image file: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Check that an upload fits the size cap and parses as an image
///
/// # Returns
/// * `Ok(ImageInfo)` - Dimensions and format of the upload
/// * `Err(ImageError::TooLarge)` - If `bytes` exceeds `max_size`
/// * `Err(ImageError)` - If the bytes are not a readable image
pub fn validate_image(bytes: &[u8], max_size: usize) -> Result<ImageInfo, ImageError> {
    decode_image_bytes(bytes, max_size).map(|(_, info)| info)
}

/// Decode raw image bytes (for multipart uploads)
pub fn decode_image_bytes(
    bytes: &[u8],
    max_size: usize,
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.len() > max_size {
        return Err(ImageError::TooLarge(bytes.len(), max_size));
    }

    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Decode an upload and fit it to the classifier input size
///
/// The image is converted to 8-bit RGB, scaled to cover `target_size`
/// with a Lanczos filter and center-cropped to exactly that size.
pub fn process_image(
    bytes: &[u8],
    target_size: (u32, u32),
    max_size: usize,
) -> Result<DynamicImage, ImageError> {
    let (img, info) = decode_image_bytes(bytes, max_size)?;
    tracing::debug!(
        "Decoded {:?} image {}x{} ({} bytes)",
        info.format,
        info.width,
        info.height,
        info.size_bytes
    );
    Ok(fit_rgb(img, target_size))
}

/// Convert to RGB and resize-then-crop to `target_size`
pub fn fit_rgb(img: DynamicImage, target_size: (u32, u32)) -> DynamicImage {
    let rgb = match img {
        DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let (width, height) = target_size;
    if rgb.width() == width && rgb.height() == height {
        return rgb;
    }

    rgb.resize_to_fill(width, height, FilterType::Lanczos3)
}

/// Decode a base64 image, accepting an optional `data:` URL prefix
pub fn decode_base64_image(
    base64_str: &str,
    max_size: usize,
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    let payload = strip_data_url(base64_str.trim());

    if payload.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let bytes = STANDARD.decode(payload)?;
    decode_image_bytes(&bytes, max_size)
}

/// Decode a base64 payload to raw bytes without parsing the image
pub fn base64_to_bytes(base64_str: &str) -> Result<Vec<u8>, ImageError> {
    let payload = strip_data_url(base64_str.trim());
    if payload.is_empty() {
        return Err(ImageError::EmptyData);
    }
    Ok(STANDARD.decode(payload)?)
}

/// Encode an image as base64 JPEG
pub fn image_to_base64(image: &DynamicImage) -> Result<String, ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(STANDARD.encode(buffer.into_inner()))
}

fn strip_data_url(input: &str) -> &str {
    match input.split_once(',') {
        Some((_, data)) => data,
        None => input,
    }
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => image::guess_format(bytes).map_err(|_| ImageError::UnsupportedFormat),
    }
}
