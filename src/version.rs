// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Crop Disease Detector

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-vit-classifier-2025-10-20";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Build date
pub const BUILD_DATE: &str = "2025-10-20";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "vit-classification",
    "cuda-fallback-cpu",
    "simulated-fallback",
    "multipart-upload",
    "base64-upload",
    "treatment-catalog",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Crop Disease Detector {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info, served at `GET /`
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
