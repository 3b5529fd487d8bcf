// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Informational route tests: /, /health, /api/v1/{health,diseases,crops}

use axum::http::StatusCode;
use crop_disease_detector::api::create_app;
use tower::util::ServiceExt;

use super::common::{get_request, json_body, unloaded_state};

#[tokio::test]
async fn test_root() {
    let response = create_app(unloaded_state())
        .oneshot(get_request("/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["message"], "Crop Disease Detection API");
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["version"]["features"]
        .as_array()
        .unwrap()
        .iter()
        .any(|feature| feature == "simulated-fallback"));
}

#[tokio::test]
async fn test_liveness() {
    let response = create_app(unloaded_state())
        .oneshot(get_request("/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "crop-disease-detector");
}

#[tokio::test]
async fn test_model_health_without_model() {
    let response = create_app(unloaded_state())
        .oneshot(get_request("/api/v1/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], false);
    assert_eq!(json["device"], "cpu");
    assert_eq!(json["supported_diseases"], 13);
    assert_eq!(json["disease_classes"].as_array().unwrap().len(), 13);
    assert_eq!(json["disease_classes"][3], "Invalid");
}

#[tokio::test]
async fn test_diseases() {
    let response = create_app(unloaded_state())
        .oneshot(get_request("/api/v1/diseases"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["count"], 13);
    assert_eq!(json["diseases"][0], "Corn___Common_Rust");
    assert_eq!(
        json["crops"],
        serde_json::json!(["Corn", "Potato", "Rice", "Wheat"])
    );
    assert_eq!(json["model_loaded"], false);
}

#[tokio::test]
async fn test_crops() {
    let response = create_app(unloaded_state())
        .oneshot(get_request("/api/v1/crops"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let crops = json.as_object().unwrap();
    assert_eq!(crops.len(), 4);
    assert_eq!(
        json["Corn"],
        serde_json::json!(["Common Rust", "Gray Leaf Spot", "Leaf Blight", "Healthy"])
    );
    for conditions in crops.values() {
        assert!(conditions
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "Healthy"));
    }
}
