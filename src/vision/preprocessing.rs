// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pixel normalisation for the Vision Transformer input

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;
use serde::Deserialize;

/// Mean values used by the ViT image processor
pub const VIT_MEAN: [f32; 3] = [0.5, 0.5, 0.5];

/// Std values used by the ViT image processor
pub const VIT_STD: [f32; 3] = [0.5, 0.5, 0.5];

/// Input size in a `preprocessor_config.json`
///
/// Older exports store a single edge length, newer ones a height/width pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InputSize {
    Square(u32),
    Dims { height: u32, width: u32 },
}

impl InputSize {
    pub fn dims(&self) -> (u32, u32) {
        match *self {
            InputSize::Square(edge) => (edge, edge),
            InputSize::Dims { height, width } => (width, height),
        }
    }
}

fn default_size() -> InputSize {
    InputSize::Square(224)
}

fn default_true() -> bool {
    true
}

fn default_rescale_factor() -> f32 {
    1.0 / 255.0
}

fn default_mean() -> [f32; 3] {
    VIT_MEAN
}

fn default_std() -> [f32; 3] {
    VIT_STD
}

/// Normalisation parameters, deserialisable from `preprocessor_config.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreprocessConfig {
    #[serde(default = "default_size")]
    pub size: InputSize,
    #[serde(default = "default_true")]
    pub do_rescale: bool,
    #[serde(default = "default_rescale_factor")]
    pub rescale_factor: f32,
    #[serde(default = "default_true")]
    pub do_normalize: bool,
    #[serde(default = "default_mean")]
    pub image_mean: [f32; 3],
    #[serde(default = "default_std")]
    pub image_std: [f32; 3],
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            do_rescale: true,
            rescale_factor: default_rescale_factor(),
            do_normalize: true,
            image_mean: VIT_MEAN,
            image_std: VIT_STD,
        }
    }
}

impl PreprocessConfig {
    /// Same normalisation with a different input edge
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = InputSize::Dims { height, width };
        self
    }

    /// Convert an image to a normalised NCHW tensor [1, 3, H, W]
    ///
    /// Steps:
    /// 1. Resize to the configured size (bilinear) when it differs
    /// 2. Rescale pixels (default 1/255)
    /// 3. Normalize: (value - mean) / std
    pub fn to_tensor(&self, image: &DynamicImage) -> Array4<f32> {
        let (width, height) = self.size.dims();

        let rgb = if image.width() == width && image.height() == height {
            image.to_rgb8()
        } else {
            image
                .resize_exact(width, height, FilterType::Triangle)
                .to_rgb8()
        };

        let scale = if self.do_rescale { self.rescale_factor } else { 1.0 };
        let mut tensor = Array4::zeros((1, 3, height as usize, width as usize));

        for (x, y, pixel) in rgb.enumerate_pixels() {
            for c in 0..3 {
                let mut value = pixel[c] as f32 * scale;
                if self.do_normalize {
                    value = (value - self.image_mean[c]) / self.image_std[c];
                }
                tensor[[0, c, y as usize, x as usize]] = value;
            }
        }

        tensor
    }
}
