// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static disease catalog: class list, descriptions and treatments
//!
//! The catalog is plain data. The default document is compiled into the
//! binary and can be replaced at startup with a JSON file of the same shape.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Embedded default catalog
const EMBEDDED_CATALOG: &str = include_str!("../../data/disease_catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has no disease classes")]
    EmptyClasses,

    #[error("Catalog {section} references unknown label '{label}'")]
    UnknownLabel { section: String, label: String },
}

/// Remedies and fungicides recommended for a label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentInfo {
    pub remedies: Vec<String>,
    pub fungicides: Vec<String>,
}

/// Read-only lookup tables shared by the classifier and enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseCatalog {
    /// Raw model labels in class-index order
    pub classes: Vec<String>,
    /// Crop names covered by the model
    pub crops: Vec<String>,
    /// Crop -> condition listing served by GET /crops
    pub crop_conditions: BTreeMap<String, Vec<String>>,
    /// Labels the degraded-mode predictor draws from
    pub mock_labels: Vec<String>,
    /// Descriptions keyed by display name
    pub descriptions: HashMap<String, String>,
    /// Template used when no description exists; `{name}` is substituted
    pub default_description: String,
    /// Treatments keyed by raw label
    pub treatments: HashMap<String, TreatmentInfo>,
    /// Generic advice for labels without a treatment entry
    pub fallback_treatment: TreatmentInfo,
}

impl DiseaseCatalog {
    /// Parse the catalog compiled into the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load from `path` when given, otherwise use the embedded catalog
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    /// Check cross references between sections
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.classes.is_empty() {
            return Err(CatalogError::EmptyClasses);
        }

        for label in &self.mock_labels {
            if !self.classes.contains(label) {
                return Err(CatalogError::UnknownLabel {
                    section: "mock_labels".to_string(),
                    label: label.clone(),
                });
            }
        }

        for label in self.treatments.keys() {
            if !self.classes.contains(label) {
                return Err(CatalogError::UnknownLabel {
                    section: "treatments".to_string(),
                    label: label.clone(),
                });
            }
        }

        Ok(())
    }

    /// Position of a label in the class list
    pub fn class_index(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Label at a class index
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(|s| s.as_str())
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }
}
