// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration and the static disease catalog

pub mod catalog;
pub mod settings;

pub use catalog::{CatalogError, DiseaseCatalog, TreatmentInfo};
pub use settings::{ConfigError, ServiceConfig, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_FILE_SIZE};
