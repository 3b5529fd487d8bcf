// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Severity tiers derived from label and confidence

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{is_healthy, INVALID_LABEL};

/// Confidence (percent) at or above which a disease is rated High
pub const HIGH_SEVERITY_THRESHOLD: f64 = 85.0;

/// Confidence (percent) at or above which a disease is rated Medium
pub const MEDIUM_SEVERITY_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Healthy plant
    None,
    Low,
    Medium,
    High,
    /// The model rejected the image
    Unknown,
}

impl Severity {
    /// Derive the severity for a raw label and a confidence in percent
    pub fn assess(label: &str, confidence: f64) -> Self {
        if is_healthy(label) {
            return Severity::None;
        }
        if label == INVALID_LABEL {
            return Severity::Unknown;
        }

        if confidence >= HIGH_SEVERITY_THRESHOLD {
            Severity::High
        } else if confidence >= MEDIUM_SEVERITY_THRESHOLD {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
