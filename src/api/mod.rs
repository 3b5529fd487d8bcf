// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use analyze::{analyze_base64_handler, analyze_handler, AnalysisResponse, AnalyzeBase64Request};
pub use errors::{ApiError, ApiErrorResponse, ErrorResponse};
pub use handlers::{
    CropsResponse, DiseasesResponse, HealthResponse, ModelHealthResponse, RootResponse,
};
pub use http_server::{create_app, start_server, AppState, API_PREFIX};
