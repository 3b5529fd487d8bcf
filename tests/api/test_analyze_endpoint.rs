// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/v1/analyze tests
//!
//! These tests verify that:
//! - Valid uploads are classified even without a model (simulated path)
//! - Non-image content types are rejected before decoding
//! - Oversize uploads are rejected regardless of content
//! - Missing and undecodable files are client errors

use axum::http::StatusCode;
use crop_disease_detector::{api::create_app, DiseaseCatalog};
use image::ImageFormat;
use tower::util::ServiceExt;

use super::common::{
    encoded_image, expected_severity, json_body, multipart_body, multipart_request,
    unloaded_state, upload_request,
};

const TEN_MB: usize = 10 * 1024 * 1024;

fn assert_severity_consistent(label: &str, confidence: f64, severity: &str) {
    assert_eq!(
        severity,
        expected_severity(label, confidence),
        "severity inconsistent with {} at {}",
        label,
        confidence
    );
}

#[tokio::test]
async fn test_jpeg_upload_without_model_is_simulated() {
    let catalog = DiseaseCatalog::embedded().unwrap();
    let jpeg = encoded_image(256, 256, ImageFormat::Jpeg);
    assert!(jpeg.len() > 10 * 1024);

    let response = create_app(unloaded_state())
        .oneshot(upload_request("image/jpeg", &jpeg))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let label = json["disease_name"].as_str().unwrap();
    let confidence = json["confidence"].as_f64().unwrap();

    assert!(catalog.mock_labels.iter().any(|l| l == label));
    assert!((75.0..=95.0).contains(&confidence));
    assert_eq!(json["is_simulated"], true);
    assert_eq!(json["is_healthy"], label.contains("Healthy"));
    assert_severity_consistent(label, confidence, json["severity"].as_str().unwrap());
    assert!(!json["description"].as_str().unwrap().is_empty());
    assert!(!json["remedies"].as_array().unwrap().is_empty());
    assert!(json["fungicides"].is_array());
}

#[tokio::test]
async fn test_repeated_uploads_stay_well_formed() {
    let png = encoded_image(64, 48, ImageFormat::Png);
    for _ in 0..10 {
        let response = create_app(unloaded_state())
            .oneshot(upload_request("image/png", &png))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        let label = json["disease_name"].as_str().unwrap();
        let confidence = json["confidence"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&confidence));
        assert_severity_consistent(label, confidence, json["severity"].as_str().unwrap());
        if label.contains("Healthy") {
            assert_eq!(json["is_healthy"], true);
            assert_eq!(json["severity"], "None");
        }
    }
}

#[tokio::test]
async fn test_non_image_content_type_rejected() {
    let png = encoded_image(32, 32, ImageFormat::Png);
    let response = create_app(unloaded_state())
        .oneshot(upload_request("text/plain", &png))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["detail"], "File must be an image");
    assert_eq!(json["error_type"], "validation_error");
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn test_oversize_upload_rejected() {
    // Content is irrelevant once the cap is exceeded
    let payload = vec![0u8; TEN_MB + 1];
    let response = create_app(unloaded_state())
        .oneshot(upload_request("image/jpeg", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(
        json["detail"],
        "Image size too large. Maximum 10MB allowed."
    );
}

#[tokio::test]
async fn test_body_over_limit_is_client_error() {
    let payload = vec![0u8; TEN_MB + 2 * 1024 * 1024];
    let response = create_app(unloaded_state())
        .oneshot(upload_request("image/jpeg", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_file_field_rejected() {
    let png = encoded_image(32, 32, ImageFormat::Png);
    let body = multipart_body("photo", "leaf.png", "image/png", &png);
    let response = create_app(unloaded_state())
        .oneshot(multipart_request("/api/v1/analyze", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["details"]["field"], "file");
}

#[tokio::test]
async fn test_undecodable_image_rejected() {
    let response = create_app(unloaded_state())
        .oneshot(upload_request("image/png", b"definitely not a png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_truncated_image_rejected() {
    let mut png = encoded_image(64, 64, ImageFormat::Png);
    png.truncate(40);
    let response = create_app(unloaded_state())
        .oneshot(upload_request("image/png", &png))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_not_allowed() {
    let response = create_app(unloaded_state())
        .oneshot(super::common::get_request("/api/v1/analyze"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
