// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod version;
pub mod vision;

pub use api::{create_app, AppState};
pub use classifier::{CropDiseaseClassifier, Prediction, PredictionSource};
pub use config::{DiseaseCatalog, ServiceConfig};
pub use enrichment::{Enricher, Severity};
