// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for leaf photographs
//!
//! This module provides:
//! - Upload validation (size cap, format sniffing, decode)
//! - RGB conversion and Lanczos fit to the classifier input size
//! - Base64 helpers for the JSON upload path
//! - Tensor normalisation for the Vision Transformer

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{
    base64_to_bytes, decode_base64_image, decode_image_bytes, detect_format, fit_rgb,
    image_to_base64, process_image, validate_image, ImageError, ImageInfo,
};
pub use preprocessing::{InputSize, PreprocessConfig};
