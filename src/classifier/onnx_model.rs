// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Vision Transformer wrapper
//!
//! Features:
//! - ONNX model loading from a checkpoint directory
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - Single-image forward pass returning raw logits

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Compute device the session is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cuda,
    Cpu,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cuda => "cuda",
            Device::Cpu => "cpu",
        }
    }
}

/// ONNX-based image classifier (ViT exported for image classification)
///
/// # Model Details
/// - Input: `pixel_values` tensor [1, 3, H, W]
/// - Output: logits [1, num_labels]
///
/// # Thread Safety
/// `Session::run` needs `&mut`, so the session sits behind a mutex.
#[derive(Clone)]
pub struct VitOnnxModel {
    /// ONNX Runtime session
    session: Arc<Mutex<Session>>,

    input_name: String,

    device: Device,
}

impl std::fmt::Debug for VitOnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VitOnnxModel")
            .field("input_name", &self.input_name)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl VitOnnxModel {
    /// Load `model.onnx`, trying CUDA first and falling back to CPU
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }

        info!("Attempting CUDA execution provider...");
        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default()
                .build()
                .error_on_failure()])
            .context("Failed to set CUDA execution provider")
            .and_then(|builder| {
                builder
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .context("Failed to set optimization level")?
                    .with_intra_threads(4)
                    .context("Failed to set intra threads")?
                    .commit_from_file(model_path)
                    .context("Failed to load model on CUDA")
            });

        let (session, device) = match cuda_result {
            Ok(session) => {
                info!("✅ CUDA execution provider initialized");
                (session, Device::Cuda)
            }
            Err(e) => {
                warn!("⚠️  CUDA execution provider failed: {:#}", e);
                warn!("   Falling back to CPU execution provider");
                let session = Session::builder()
                    .context("Failed to create session builder")?
                    .with_execution_providers([CPUExecutionProvider::default().build()])
                    .context("Failed to set CPU execution provider")?
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .context("Failed to set optimization level")?
                    .with_intra_threads(4)
                    .context("Failed to set intra threads")?
                    .commit_from_file(model_path)
                    .context(format!(
                        "Failed to load ONNX model from {}",
                        model_path.display()
                    ))?;
                (session, Device::Cpu)
            }
        };

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "pixel_values".to_string());

        debug!("Classifier model input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            device,
        })
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Run a forward pass and return the logits of the single image
    pub fn run(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let shape = input.shape();
        if shape.len() != 4 || shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("Invalid input shape: {:?}, expected [1, 3, H, W]", shape);
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Classifier session lock poisoned"))?;

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("Classifier inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract logits tensor")?;

        debug!("Classifier output shape: {:?}", output_tensor.shape());

        let logits: Vec<f32> = output_tensor.iter().copied().collect();
        Ok(logits)
    }
}
