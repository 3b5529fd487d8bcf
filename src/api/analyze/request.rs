// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis request types and upload extraction

use axum::body::Bytes;
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::errors::ApiError;

/// Multipart field carrying the photograph
pub const FILE_FIELD: &str = "file";

/// JSON upload: base64 image, optionally as a `data:` URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeBase64Request {
    #[serde(default)]
    pub image_data: Option<String>,
}

impl AnalyzeBase64Request {
    /// Validate and return the base64 payload
    pub fn validate(&self, max_file_size: usize) -> Result<&str, ApiError> {
        let data = match self.image_data.as_deref().map(str::trim) {
            Some(data) if !data.is_empty() => data,
            _ => {
                return Err(ApiError::ValidationError {
                    field: "image_data".to_string(),
                    message: "image_data is required".to_string(),
                })
            }
        };

        if data.len() > max_encoded_len(max_file_size) {
            return Err(size_error("image_data", max_file_size));
        }

        Ok(data)
    }
}

const MAX_DATA_URL_PREFIX: usize = 64;

/// Longest `image_data` string that can decode to at most `max_file_size` bytes
pub fn max_encoded_len(max_file_size: usize) -> usize {
    // base64 inflates by 4/3
    max_file_size / 3 * 4 + 4 + MAX_DATA_URL_PREFIX
}

/// File part of a multipart upload
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// Error for uploads over the size cap
pub fn size_error(field: &str, max_file_size: usize) -> ApiError {
    ApiError::ValidationError {
        field: field.to_string(),
        message: format!(
            "Image size too large. Maximum {}MB allowed.",
            max_file_size / (1024 * 1024)
        ),
    }
}

/// Pull the `file` field out of a multipart body
///
/// The content type is checked before the body is read so non-image
/// uploads are rejected without buffering them. Other fields are skipped.
pub async fn read_upload(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_image_content_type(&content_type) {
            return Err(ApiError::ValidationError {
                field: FILE_FIELD.to_string(),
                message: "File must be an image".to_string(),
            });
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {}", e)))?;

        if bytes.len() > max_file_size {
            return Err(size_error(FILE_FIELD, max_file_size));
        }

        return Ok(ImageUpload {
            filename,
            content_type,
            bytes,
        });
    }

    Err(ApiError::ValidationError {
        field: FILE_FIELD.to_string(),
        message: "file is required".to_string(),
    })
}
