// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service settings loaded from the environment

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Default upload cap (10MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Default square input edge for the classifier
pub const DEFAULT_IMAGE_SIZE: u32 = 224;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
}

/// Runtime settings for the detection service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Human readable service title
    pub app_name: String,
    /// Reported API version
    pub version: String,
    /// Verbose logging and request tracing
    pub debug: bool,
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
    /// Directory holding the ViT checkpoint (model.onnx + configs)
    pub model_path: PathBuf,
    /// Upstream model the checkpoint was fine-tuned from
    pub model_name: String,
    /// Edge length of the square classifier input
    pub image_size: u32,
    /// Maximum accepted upload in bytes
    pub max_file_size: usize,
    /// Optional JSON file replacing the embedded disease catalog
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            app_name: "Crop Disease Detection API".to_string(),
            version: "1.0.0".to_string(),
            debug: true,
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            model_path: PathBuf::from("models/crop_leaf_diseases_vit"),
            model_name: "google/vit-base-patch16-224".to_string(),
            image_size: DEFAULT_IMAGE_SIZE,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            catalog_path: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenv::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to
    /// defaults for missing or unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
            version: lookup("APP_VERSION").unwrap_or(defaults.version),
            debug: lookup("DEBUG")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.debug),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| parse_list(&v))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.allowed_origins),
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            model_name: lookup("MODEL_NAME").unwrap_or(defaults.model_name),
            image_size: lookup("IMAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.image_size),
            max_file_size: lookup("MAX_FILE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_file_size),
            catalog_path: lookup("DISEASE_CATALOG_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "PORT".to_string(),
                message: "port must be greater than 0".to_string(),
            });
        }
        if self.image_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "IMAGE_SIZE".to_string(),
                message: "image size must be greater than 0".to_string(),
            });
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "MAX_FILE_SIZE".to_string(),
                message: "max file size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address the HTTP server binds to
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| ConfigError::InvalidAddress(addr.clone()))
    }

    /// Classifier input size as (width, height)
    pub fn target_size(&self) -> (u32, u32) {
        (self.image_size, self.image_size)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
