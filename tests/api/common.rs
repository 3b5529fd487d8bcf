// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared helpers for router tests
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
};
use crop_disease_detector::{
    api::AppState, config::ServiceConfig, CropDiseaseClassifier, DiseaseCatalog,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use rand::Rng;
use std::io::Cursor;
use std::sync::Arc;

pub const BOUNDARY: &str = "----crop-disease-test-boundary";

/// State with the embedded catalog and no model
pub fn unloaded_state() -> AppState {
    let catalog = Arc::new(DiseaseCatalog::embedded().unwrap());
    AppState::new(ServiceConfig::default(), CropDiseaseClassifier::unloaded(catalog))
}

/// Noisy leaf-green image encoded in `format`
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let img = RgbImage::from_fn(width, height, |_, _| {
        Rgb([
            rng.gen_range(0..80),
            rng.gen_range(100..220),
            rng.gen_range(0..90),
        ])
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, format)
        .unwrap();
    buffer.into_inner()
}

pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn upload_request(content_type: &str, data: &[u8]) -> Request<Body> {
    multipart_request(
        "/api/v1/analyze",
        multipart_body("file", "leaf.jpg", content_type, data),
    )
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(uri: &str, json: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Severity the service must report for a label and returned confidence
pub fn expected_severity(label: &str, confidence: f64) -> &'static str {
    if label.contains("Healthy") {
        "None"
    } else if label == "Invalid" {
        "Unknown"
    } else if confidence >= 85.0 {
        "High"
    } else if confidence >= 70.0 {
        "Medium"
    } else {
        "Low"
    }
}
