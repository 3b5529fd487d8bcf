// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{OriginalUri, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::{ApiError, ApiErrorResponse};
use super::http_server::AppState;
use crate::version;

pub const SERVICE_NAME: &str = "crop-disease-detector";
pub const ROOT_MESSAGE: &str = "Crop Disease Detection API";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub version: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelHealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub device: String,
    pub supported_diseases: usize,
    pub disease_classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseasesResponse {
    pub diseases: Vec<String>,
    pub count: usize,
    pub crops: Vec<String>,
    pub model_loaded: bool,
}

/// Crop name to its detectable conditions
pub type CropsResponse = BTreeMap<String, Vec<String>>;

/// Fallback for unmatched routes
pub async fn not_found_handler(OriginalUri(uri): OriginalUri) -> ApiErrorResponse {
    ApiError::NotFound(format!("No route for {}", uri.path()))
        .with_request_id(uuid::Uuid::new_v4().to_string())
}

/// GET /
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
        status: "healthy".to_string(),
        version: version::get_version_info(),
    })
}

/// GET /health - liveness only
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// GET /api/v1/health - model status and compute device
pub async fn model_health_handler(State(state): State<AppState>) -> Json<ModelHealthResponse> {
    let classes = state.catalog().classes.clone();
    Json(ModelHealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.classifier.is_loaded(),
        device: state.classifier.device().to_string(),
        supported_diseases: classes.len(),
        disease_classes: classes,
    })
}

/// GET /api/v1/diseases - label list and crops
pub async fn diseases_handler(State(state): State<AppState>) -> Json<DiseasesResponse> {
    let catalog = state.catalog();
    Json(DiseasesResponse {
        diseases: catalog.classes.clone(),
        count: catalog.num_classes(),
        crops: catalog.crops.clone(),
        model_loaded: state.classifier.is_loaded(),
    })
}

/// GET /api/v1/crops - static crop to condition listing
pub async fn crops_handler(State(state): State<AppState>) -> Json<CropsResponse> {
    Json(state.catalog().crop_conditions.clone())
}
