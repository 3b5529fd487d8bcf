// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis API endpoint module
//!
//! Provides POST /api/v1/analyze (multipart) and
//! POST /api/v1/analyze/base64 (JSON).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{analyze_base64_handler, analyze_handler, json_rejection_error, relabel_invalid};
pub use request::{max_encoded_len, AnalyzeBase64Request, ImageUpload};
pub use response::AnalysisResponse;
