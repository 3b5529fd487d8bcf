// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crop disease classifier
//!
//! Wraps the ViT checkpoint behind a `predict` call that always answers.
//! When the checkpoint is missing, fails to load, or a forward pass errors,
//! a simulated prediction is drawn from the catalog's mock labels and is
//! tagged as such.

pub mod model_config;
pub mod onnx_model;
pub mod postprocess;

pub use model_config::{CheckpointPaths, ModelConfig};
pub use onnx_model::{Device, VitOnnxModel};

use anyhow::{Context, Result};
use image::DynamicImage;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::DiseaseCatalog;
use crate::enrichment::INVALID_LABEL;
use crate::vision::PreprocessConfig;

/// Confidence range (percent) of simulated predictions
pub const MOCK_CONFIDENCE_MIN: f64 = 75.0;
pub const MOCK_CONFIDENCE_MAX: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Model,
    Simulated,
}

/// Result of a single classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Raw class label, e.g. `Corn___Common_Rust`
    pub label: String,
    /// Percent in [0, 100]
    pub confidence: f64,
    pub class_index: usize,
    pub source: PredictionSource,
}

impl Prediction {
    pub fn is_simulated(&self) -> bool {
        self.source == PredictionSource::Simulated
    }
}

#[derive(Debug)]
struct LoadedModel {
    model: VitOnnxModel,
    preprocess: PreprocessConfig,
}

/// Classifier state shared by all requests
#[derive(Debug)]
pub struct CropDiseaseClassifier {
    catalog: Arc<DiseaseCatalog>,
    model: Option<LoadedModel>,
}

impl CropDiseaseClassifier {
    /// Classifier with no model; every prediction is simulated
    pub fn unloaded(catalog: Arc<DiseaseCatalog>) -> Self {
        Self {
            catalog,
            model: None,
        }
    }

    /// Load the checkpoint in `model_dir`
    ///
    /// Never fails: any load error is logged and the classifier stays
    /// unloaded so the service can run in degraded mode.
    pub fn load(model_dir: impl AsRef<Path>, catalog: Arc<DiseaseCatalog>) -> Self {
        let model_dir = model_dir.as_ref();
        match Self::load_checkpoint(model_dir, &catalog) {
            Ok(loaded) => {
                info!(
                    "✅ Classifier loaded from {} on {}",
                    model_dir.display(),
                    loaded.model.device().as_str()
                );
                Self {
                    catalog,
                    model: Some(loaded),
                }
            }
            Err(e) => {
                warn!(
                    "⚠️ Failed to load classifier from {}: {:#}",
                    model_dir.display(),
                    e
                );
                warn!("   Predictions will be simulated");
                Self::unloaded(catalog)
            }
        }
    }

    fn load_checkpoint(model_dir: &Path, catalog: &DiseaseCatalog) -> Result<LoadedModel> {
        if !model_dir.is_dir() {
            anyhow::bail!("Checkpoint directory not found: {}", model_dir.display());
        }

        let paths = CheckpointPaths::new(model_dir);
        if let Some(config) = paths.model_config()? {
            config.check_against(&catalog.classes)?;
        }
        let preprocess = paths.preprocess_config()?;
        let model = VitOnnxModel::load(&paths.model)?;

        Ok(LoadedModel { model, preprocess })
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// `"cuda"` or `"cpu"`; an unloaded classifier reports `"cpu"`
    pub fn device(&self) -> &'static str {
        self.model
            .as_ref()
            .map(|loaded| loaded.model.device())
            .unwrap_or(Device::Cpu)
            .as_str()
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    /// Shared handle to the catalog the labels come from
    pub fn catalog_handle(&self) -> Arc<DiseaseCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Drop the model; later predictions are simulated
    pub fn unload(&mut self) {
        if self.model.take().is_some() {
            info!("Classifier model unloaded");
        }
    }

    /// Classify an already fitted RGB image
    pub fn predict(&self, image: &DynamicImage) -> Prediction {
        let Some(loaded) = &self.model else {
            debug!("Model not loaded, returning simulated prediction");
            return self.mock_prediction();
        };

        match self.run_model(loaded, image) {
            Ok(prediction) => prediction,
            Err(e) => {
                error!("Prediction failed, returning simulated result: {:#}", e);
                self.mock_prediction()
            }
        }
    }

    fn run_model(&self, loaded: &LoadedModel, image: &DynamicImage) -> Result<Prediction> {
        let tensor = loaded.preprocess.to_tensor(image);
        let logits = loaded.model.run(tensor)?;

        let (class_index, confidence) = postprocess::top_class(&logits)
            .context("Model returned no usable logits")?;
        let label = self
            .catalog
            .label_at(class_index)
            .with_context(|| format!("Class index {} has no catalog label", class_index))?;

        debug!("Model predicted {} ({:.2}%)", label, confidence);

        Ok(Prediction {
            label: label.to_string(),
            confidence,
            class_index,
            source: PredictionSource::Model,
        })
    }

    /// Random label from the mock subset with confidence in [75, 95]
    pub fn mock_prediction(&self) -> Prediction {
        let mut rng = rand::thread_rng();

        let pool = if self.catalog.mock_labels.is_empty() {
            &self.catalog.classes
        } else {
            &self.catalog.mock_labels
        };
        let label = pool
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| INVALID_LABEL.to_string());
        let class_index = self.catalog.class_index(&label).unwrap_or(0);
        let confidence = rng.gen_range(MOCK_CONFIDENCE_MIN..=MOCK_CONFIDENCE_MAX);

        Prediction {
            label,
            confidence,
            class_index,
            source: PredictionSource::Simulated,
        }
    }
}
