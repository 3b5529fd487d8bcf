// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::analyze::{analyze_base64_handler, analyze_handler, max_encoded_len};
use super::handlers::{
    crops_handler, diseases_handler, health_handler, model_health_handler, not_found_handler,
    root_handler,
};
use crate::classifier::CropDiseaseClassifier;
use crate::config::{DiseaseCatalog, ServiceConfig};
use crate::enrichment::Enricher;

/// Prefix of the versioned routes
pub const API_PREFIX: &str = "/api/v1";

/// Headroom above the payload cap for multipart and JSON framing
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub classifier: Arc<CropDiseaseClassifier>,
    pub enricher: Enricher,
}

impl AppState {
    /// The enricher shares the classifier's catalog
    pub fn new(config: ServiceConfig, classifier: CropDiseaseClassifier) -> Self {
        let enricher = Enricher::new(classifier.catalog_handle());
        Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
            enricher,
        }
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        self.enricher.catalog()
    }
}

/// Build the router with all routes and layers
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + BODY_LIMIT_HEADROOM;
    let base64_body_limit = max_encoded_len(state.config.max_file_size) + BODY_LIMIT_HEADROOM;
    let cors = cors_layer(&state.config.allowed_origins);

    let api = Router::new()
        .route("/analyze", post(analyze_handler))
        .route(
            "/analyze/base64",
            post(analyze_base64_handler).layer(DefaultBodyLimit::max(base64_body_limit)),
        )
        .route("/diseases", get(diseases_handler))
        .route("/health", get(model_health_handler))
        .route("/crops", get(crops_handler));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest(API_PREFIX, api)
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins, with credentials
///
/// Credentials rule out wildcard origins, so methods and headers mirror
/// the request instead of using `Any`.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.listen_addr()?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
