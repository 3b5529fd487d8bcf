// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis response types

use serde::{Deserialize, Serialize};

use crate::classifier::Prediction;
use crate::enrichment::{is_healthy, Enricher, Severity};

/// Result of analysing one leaf photograph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Raw class label, or "Unknown Disease" after the invalid relabel
    pub disease_name: String,
    /// Percent, rounded to 2 decimals
    pub confidence: f64,
    pub description: String,
    pub remedies: Vec<String>,
    pub fungicides: Vec<String>,
    pub is_healthy: bool,
    pub severity: Severity,
    /// True when the label came from the simulated fallback
    pub is_simulated: bool,
}

impl AnalysisResponse {
    /// Enrich a (possibly relabelled) prediction
    ///
    /// Severity is assessed on the rounded confidence that is returned.
    pub fn from_prediction(prediction: &Prediction, enricher: &Enricher) -> Self {
        let label = prediction.label.as_str();
        let confidence = round_confidence(prediction.confidence);
        let treatment = enricher.treatment(label);

        Self {
            disease_name: label.to_string(),
            confidence,
            description: enricher.description(label),
            remedies: treatment.remedies,
            fungicides: treatment.fungicides,
            is_healthy: is_healthy(label),
            severity: enricher.severity(label, confidence),
            is_simulated: prediction.is_simulated(),
        }
    }
}

pub fn round_confidence(confidence: f64) -> f64 {
    (confidence * 100.0).round() / 100.0
}
