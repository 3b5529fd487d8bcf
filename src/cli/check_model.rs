// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use crate::classifier::{CheckpointPaths, VitOnnxModel};
use crate::config::{DiseaseCatalog, ServiceConfig};

/// Arguments for the check-model command
#[derive(Args, Debug, Default, Clone)]
pub struct CheckModelArgs {
    /// Checkpoint directory (defaults to MODEL_PATH)
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Disease catalog JSON to compare labels against
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Summary of a checkpoint directory
#[derive(Debug, Default)]
pub struct CheckpointReport {
    pub dir_exists: bool,
    pub declared_labels: Option<usize>,
    pub labels: Vec<(usize, String)>,
    pub label_ids: Vec<(String, usize)>,
    pub config_error: Option<String>,
    pub catalog_mismatch: Option<String>,
    pub preprocessor_ok: bool,
    pub preprocessor_error: Option<String>,
    pub model_device: Option<&'static str>,
    pub model_error: Option<String>,
}

impl CheckpointReport {
    /// Whether the service would run the real model
    pub fn is_usable(&self) -> bool {
        self.dir_exists
            && self.config_error.is_none()
            && self.catalog_mismatch.is_none()
            && self.preprocessor_ok
            && self.model_device.is_some()
    }
}

/// Inspect a checkpoint directory
///
/// `load_model` controls whether the ONNX session is actually built.
pub fn inspect_checkpoint(
    dir: &Path,
    catalog: &DiseaseCatalog,
    load_model: bool,
) -> CheckpointReport {
    let mut report = CheckpointReport {
        dir_exists: dir.is_dir(),
        ..Default::default()
    };
    if !report.dir_exists {
        return report;
    }

    let paths = CheckpointPaths::new(dir);

    match paths.model_config() {
        Ok(Some(config)) => {
            report.declared_labels = config.label_count();
            report.labels = config.ordered_labels();
            report.label_ids = config.ordered_label_ids();
            if let Err(e) = config.check_against(&catalog.classes) {
                report.catalog_mismatch = Some(e.to_string());
            }
        }
        Ok(None) => {}
        Err(e) => report.config_error = Some(format!("{:#}", e)),
    }

    match paths.preprocess_config() {
        Ok(_) => report.preprocessor_ok = true,
        Err(e) => report.preprocessor_error = Some(format!("{:#}", e)),
    }

    if load_model {
        match VitOnnxModel::load(&paths.model) {
            Ok(model) => report.model_device = Some(model.device().as_str()),
            Err(e) => report.model_error = Some(format!("{:#}", e)),
        }
    }

    report
}

/// Print a report for the configured checkpoint
pub fn check_model(args: CheckModelArgs) -> Result<()> {
    let config = ServiceConfig::from_env();
    let dir = args.model_path.unwrap_or(config.model_path);
    let catalog_path = args.catalog.or(config.catalog_path);
    let catalog = DiseaseCatalog::load(catalog_path.as_deref())?;

    println!("🔍 Checking model at: {}", dir.display());
    let report = inspect_checkpoint(&dir, &catalog, true);

    if !report.dir_exists {
        println!("❌ Model path {} does not exist", dir.display());
        return Ok(());
    }

    println!("\n📋 Model configuration:");
    match (&report.config_error, report.declared_labels) {
        (Some(e), _) => println!("  ❌ config.json: {}", e),
        (None, Some(count)) => println!("  Number of classes: {}", count),
        (None, None) => println!("  Number of classes: Not found"),
    }
    if report.labels.is_empty() {
        println!("  ID to label: Not found");
    } else {
        println!("  ID to label:");
        for (id, label) in &report.labels {
            println!("    {}: {}", id, label);
        }
    }
    if report.label_ids.is_empty() {
        println!("  Label to ID: Not found");
    } else {
        println!("  Label to ID:");
        for (label, id) in &report.label_ids {
            println!("    {}: {}", label, id);
        }
    }
    if let Some(mismatch) = &report.catalog_mismatch {
        println!("  ⚠️  {}", mismatch);
    }

    match &report.preprocessor_error {
        None => println!("\n✅ Processor config loaded successfully"),
        Some(e) => println!("\n❌ Error loading processor: {}", e),
    }

    match (&report.model_device, &report.model_error) {
        (Some(device), _) => println!("✅ Model loaded successfully on {}", device),
        (None, Some(e)) => println!("❌ Error loading model: {}", e),
        (None, None) => {}
    }

    println!("\nCatalog classes ({}):", catalog.num_classes());
    for (id, label) in catalog.classes.iter().enumerate() {
        println!("  {}: {}", id, label);
    }

    if report.is_usable() {
        println!("\n✅ Checkpoint is usable");
    } else {
        println!("\n⚠️  Service would run with simulated predictions");
    }

    Ok(())
}
