// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Checkpoint directory layout and `config.json` parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::vision::PreprocessConfig;

pub const MODEL_FILE: &str = "model.onnx";
pub const CONFIG_FILE: &str = "config.json";
pub const PREPROCESSOR_FILE: &str = "preprocessor_config.json";

/// Subset of a Hugging Face `config.json` used by the classifier
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub num_labels: Option<usize>,
    #[serde(default)]
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub label2id: HashMap<String, usize>,
}

impl ModelConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Declared label count, falling back to the `id2label` size
    pub fn label_count(&self) -> Option<usize> {
        self.num_labels.or_else(|| {
            if self.id2label.is_empty() {
                None
            } else {
                Some(self.id2label.len())
            }
        })
    }

    /// Labels ordered by class id, skipping ids that are not integers
    pub fn ordered_labels(&self) -> Vec<(usize, String)> {
        let mut labels: Vec<(usize, String)> = self
            .id2label
            .iter()
            .filter_map(|(id, label)| id.parse::<usize>().ok().map(|id| (id, label.clone())))
            .collect();
        labels.sort_by_key(|(id, _)| *id);
        labels
    }

    /// `label2id` entries ordered by class id
    pub fn ordered_label_ids(&self) -> Vec<(String, usize)> {
        let mut ids: Vec<(String, usize)> = self
            .label2id
            .iter()
            .map(|(label, id)| (label.clone(), *id))
            .collect();
        ids.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        ids
    }

    /// Check the declared labels against the catalog class list
    ///
    /// A count mismatch is an error. Name mismatches are only logged since
    /// the catalog order decides the label either way.
    pub fn check_against(&self, classes: &[String]) -> Result<()> {
        if let Some(count) = self.label_count() {
            if count != classes.len() {
                anyhow::bail!(
                    "Checkpoint declares {} labels but the catalog lists {} classes",
                    count,
                    classes.len()
                );
            }
        }

        for (id, label) in self.ordered_labels() {
            match classes.get(id) {
                Some(expected) if expected == &label => {}
                Some(expected) => warn!(
                    "Label {} is '{}' in the checkpoint but '{}' in the catalog",
                    id, label, expected
                ),
                None => warn!("Checkpoint label id {} ('{}') is out of range", id, label),
            }
        }

        Ok(())
    }
}

/// Files making up a checkpoint directory
#[derive(Debug, Clone)]
pub struct CheckpointPaths {
    pub dir: PathBuf,
    pub model: PathBuf,
    pub config: PathBuf,
    pub preprocessor: PathBuf,
}

impl CheckpointPaths {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            model: dir.join(MODEL_FILE),
            config: dir.join(CONFIG_FILE),
            preprocessor: dir.join(PREPROCESSOR_FILE),
            dir,
        }
    }

    /// `config.json` if present
    pub fn model_config(&self) -> Result<Option<ModelConfig>> {
        if !self.config.exists() {
            return Ok(None);
        }
        ModelConfig::from_file(&self.config).map(Some)
    }

    /// `preprocessor_config.json` if present, defaults otherwise
    pub fn preprocess_config(&self) -> Result<PreprocessConfig> {
        if !self.preprocessor.exists() {
            return Ok(PreprocessConfig::default());
        }
        let raw = fs::read_to_string(&self.preprocessor)
            .with_context(|| format!("Failed to read {}", self.preprocessor.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.preprocessor.display()))
    }
}
