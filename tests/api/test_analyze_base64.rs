// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/v1/analyze/base64 tests

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use crop_disease_detector::api::create_app;
use image::ImageFormat;
use serde_json::json;
use tower::util::ServiceExt;

use super::common::{encoded_image, json_body, json_request, unloaded_state};

const URI: &str = "/api/v1/analyze/base64";
const MB: usize = 1024 * 1024;

/// PNG signature followed by zeros; within the size cap but undecodable
fn png_prefixed(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    data[..8].copy_from_slice(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    data
}

#[tokio::test]
async fn test_plain_base64() {
    let png = encoded_image(40, 40, ImageFormat::Png);
    let request = json_request(URI, &json!({ "image_data": STANDARD.encode(&png) }));

    let response = create_app(unloaded_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["is_simulated"], true);
    assert!(json["disease_name"].is_string());
}

#[tokio::test]
async fn test_data_url() {
    let jpeg = encoded_image(40, 40, ImageFormat::Jpeg);
    let data_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg));
    let request = json_request(URI, &json!({ "image_data": data_url }));

    let response = create_app(unloaded_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_image_data() {
    let response = create_app(unloaded_state())
        .oneshot(json_request(URI, &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["details"]["field"], "image_data");
}

#[tokio::test]
async fn test_invalid_base64() {
    let response = create_app(unloaded_state())
        .oneshot(json_request(URI, &json!({ "image_data": "@@not base64@@" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_base64_of_non_image() {
    let request = json_request(URI, &json!({ "image_data": STANDARD.encode(b"hello world") }));
    let response = create_app(unloaded_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nine_megabyte_payload_reaches_handler() {
    let payload = STANDARD.encode(png_prefixed(9 * MB));
    assert!(payload.len() > 10 * MB + MB);

    let response = create_app(unloaded_state())
        .oneshot(json_request(URI, &json!({ "image_data": payload })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error_type"], "invalid_request");
    assert!(json["request_id"].is_string());
    assert_ne!(json["detail"], "Image size too large. Maximum 10MB allowed.");
}

#[tokio::test]
async fn test_oversize_payload_is_json_validation_error() {
    // Past the string cap, then past the route body limit
    for len in [13 * MB + MB / 2, 16 * MB] {
        let payload = "A".repeat(len);
        let response = create_app(unloaded_state())
            .oneshot(json_request(URI, &json!({ "image_data": payload })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "len {}", len);

        let json = json_body(response).await;
        assert_eq!(json["error_type"], "validation_error");
        assert_eq!(json["details"]["field"], "image_data");
        assert_eq!(json["detail"], "Image size too large. Maximum 10MB allowed.");
    }
}

#[tokio::test]
async fn test_malformed_json_is_json_error() {
    let request = Request::builder()
        .method(Method::POST)
        .uri(URI)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"image_data\": "))
        .unwrap();

    let response = create_app(unloaded_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error_type"], "invalid_request");
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn test_missing_content_type_is_json_error() {
    let request = Request::builder()
        .method(Method::POST)
        .uri(URI)
        .body(Body::from(json!({ "image_data": "AAAA" }).to_string()))
        .unwrap();

    let response = create_app(unloaded_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error_type"], "invalid_request");
}
