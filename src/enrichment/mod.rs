// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label enrichment: display names, descriptions, severity and treatments
//!
//! Everything here is a pure lookup against the `DiseaseCatalog`.

pub mod severity;

pub use severity::{Severity, HIGH_SEVERITY_THRESHOLD, MEDIUM_SEVERITY_THRESHOLD};

use std::sync::Arc;

use crate::config::{DiseaseCatalog, TreatmentInfo};

/// Separator between crop and condition in raw labels
pub const LABEL_SEPARATOR: &str = "___";

/// Substring marking a healthy class
pub const HEALTHY_MARKER: &str = "Healthy";

/// Sentinel label for images the model rejects
pub const INVALID_LABEL: &str = "Invalid";

/// Display name for the sentinel label
pub const UNKNOWN_DISEASE: &str = "Unknown Disease";

/// Convert a raw label into a display name
///
/// `"Corn___Common_Rust"` becomes `"Corn Common Rust"`. Already formatted
/// names pass through unchanged.
pub fn format_disease_name(label: &str) -> String {
    if label == INVALID_LABEL {
        return UNKNOWN_DISEASE.to_string();
    }
    label.replace(LABEL_SEPARATOR, " ").replace('_', " ")
}

/// Whether a label denotes a healthy plant
pub fn is_healthy(label: &str) -> bool {
    label.contains(HEALTHY_MARKER)
}

/// Catalog-backed lookups used when building an analysis response
#[derive(Debug, Clone)]
pub struct Enricher {
    catalog: Arc<DiseaseCatalog>,
}

impl Enricher {
    pub fn new(catalog: Arc<DiseaseCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    /// Description for a label, or the default template
    pub fn description(&self, label: &str) -> String {
        let name = format_disease_name(label);
        match self.catalog.descriptions.get(&name) {
            Some(description) => description.clone(),
            None => self.catalog.default_description.replace("{name}", &name),
        }
    }

    pub fn severity(&self, label: &str, confidence: f64) -> Severity {
        Severity::assess(label, confidence)
    }

    /// Treatment for a label, or the generic fallback
    pub fn treatment(&self, label: &str) -> TreatmentInfo {
        self.catalog
            .treatments
            .get(label)
            .cloned()
            .unwrap_or_else(|| self.catalog.fallback_treatment.clone())
    }
}
