// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::request::{read_upload, size_error, AnalyzeBase64Request};
use super::response::AnalysisResponse;
use crate::api::errors::{ApiError, ApiErrorResponse};
use crate::api::http_server::AppState;
use crate::classifier::Prediction;
use crate::enrichment::{INVALID_LABEL, UNKNOWN_DISEASE};
use crate::vision::{base64_to_bytes, process_image};

/// Confidence above which an "Invalid" prediction is relabelled
pub const INVALID_RELABEL_THRESHOLD: f64 = 70.0;

/// Factor applied to the confidence of a relabelled prediction
pub const INVALID_CONFIDENCE_SCALE: f64 = 0.7;

/// POST /api/v1/analyze - Classify an uploaded leaf photograph
///
/// # Request
/// - multipart field `file`: image upload (`image/*`, at most `MAX_FILE_SIZE`)
///
/// # Response
/// - `disease_name`, `confidence`, `description`, `remedies`, `fungicides`,
///   `is_healthy`, `severity`, `is_simulated`
///
/// # Errors
/// - 400 Bad Request: missing file, non-image content type, oversize or
///   undecodable upload
/// - 500 Internal Server Error: analysis failed
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    debug!("[{}] Analysis request received", request_id);

    let upload = read_upload(multipart, state.config.max_file_size)
        .await
        .map_err(|e| {
            warn!("[{}] Upload rejected: {}", request_id, e);
            e.with_request_id(&request_id)
        })?;

    debug!(
        "[{}] Upload {:?} ({}, {} bytes)",
        request_id,
        upload.filename,
        upload.content_type,
        upload.bytes.len()
    );

    analyze_bytes(&state, upload.bytes.to_vec(), &request_id)
        .await
        .map(Json)
        .map_err(|e| e.with_request_id(&request_id))
}

/// POST /api/v1/analyze/base64 - Classify a base64-encoded photograph
///
/// # Request
/// - `image_data`: base64 image, optionally as a `data:` URL
///
/// # Response
/// Same as `/api/v1/analyze`.
///
/// # Errors
/// - 400 Bad Request: missing, oversize, malformed or undecodable data,
///   including bodies that are not valid JSON
/// - 500 Internal Server Error: analysis failed
pub async fn analyze_base64_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeBase64Request>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    debug!("[{}] Base64 analysis request received", request_id);

    let Json(request) = payload.map_err(|rejection| {
        let error = json_rejection_error(&rejection, state.config.max_file_size);
        warn!("[{}] Body rejected: {}", request_id, rejection.body_text());
        error.with_request_id(&request_id)
    })?;

    let bytes = request
        .validate(state.config.max_file_size)
        .and_then(|data| base64_to_bytes(data).map_err(ApiError::from))
        .map_err(|e| {
            warn!("[{}] Upload rejected: {}", request_id, e);
            e.with_request_id(&request_id)
        })?;

    if bytes.len() > state.config.max_file_size {
        return Err(size_error("image_data", state.config.max_file_size)
            .with_request_id(&request_id));
    }

    analyze_bytes(&state, bytes, &request_id)
        .await
        .map(Json)
        .map_err(|e| e.with_request_id(&request_id))
}

/// Map a JSON extractor failure onto the API error shape
pub fn json_rejection_error(rejection: &JsonRejection, max_file_size: usize) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        size_error("image_data", max_file_size)
    } else {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

/// Preprocess, classify and enrich one image
async fn analyze_bytes(
    state: &AppState,
    bytes: Vec<u8>,
    request_id: &str,
) -> Result<AnalysisResponse, ApiError> {
    let started = Instant::now();
    let target_size = state.config.target_size();
    let max_file_size = state.config.max_file_size;
    let classifier = state.classifier.clone();

    let prediction = tokio::task::spawn_blocking(move || {
        process_image(&bytes, target_size, max_file_size).map(|image| classifier.predict(&image))
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Analysis failed: {}", e)))?
    .map_err(|e| {
        warn!("[{}] Image rejected: {}", request_id, e);
        ApiError::from(e)
    })?;

    let prediction = relabel_invalid(prediction);
    let response = AnalysisResponse::from_prediction(&prediction, &state.enricher);

    info!(
        "[{}] Analysis completed: {} ({:.2}%) - Severity: {}{} in {}ms",
        request_id,
        response.disease_name,
        prediction.confidence,
        response.severity,
        if response.is_simulated { " [simulated]" } else { "" },
        started.elapsed().as_millis()
    );

    Ok(response)
}

/// Downgrade an overconfident "Invalid" prediction to "Unknown Disease"
pub fn relabel_invalid(mut prediction: Prediction) -> Prediction {
    if prediction.label == INVALID_LABEL && prediction.confidence > INVALID_RELABEL_THRESHOLD {
        prediction.label = UNKNOWN_DISEASE.to_string();
        prediction.confidence *= INVALID_CONFIDENCE_SCALE;
    }
    prediction
}
