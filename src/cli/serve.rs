// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::{builder::BoolishValueParser, Args};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::{start_server, AppState};
use crate::classifier::CropDiseaseClassifier;
use crate::config::{DiseaseCatalog, ServiceConfig};
use crate::version;

/// Arguments for the serve command
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Bind port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Checkpoint directory
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Disease catalog JSON
    #[arg(long, env = "DISEASE_CATALOG_PATH")]
    pub catalog: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, env = "DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: bool,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the environment config
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model_path) = &self.model_path {
            config.model_path = model_path.clone();
        }
        if let Some(catalog) = &self.catalog {
            config.catalog_path = Some(catalog.clone());
        }
        if self.debug {
            config.debug = true;
        }
    }
}

/// Load the catalog and classifier, then serve until shutdown
pub async fn serve(config: ServiceConfig) -> Result<()> {
    info!("🚀 Starting {}", version::get_version_string());
    info!("   App: {} {}", config.app_name, config.version);
    info!("   Model: {} ({})", config.model_name, config.model_path.display());

    let catalog = DiseaseCatalog::load(config.catalog_path.as_deref())
        .context("Failed to load disease catalog")?;
    let catalog = Arc::new(catalog);
    info!("   Catalog: {} classes", catalog.num_classes());

    let model_path = config.model_path.clone();
    let classifier = tokio::task::spawn_blocking(move || {
        CropDiseaseClassifier::load(model_path, catalog)
    })
    .await
    .context("Classifier loading task failed")?;

    info!(
        "   Classifier: loaded={} device={}",
        classifier.is_loaded(),
        classifier.device()
    );

    let state = AppState::new(config, classifier);
    start_server(state).await
}
