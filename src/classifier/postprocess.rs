// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Logit post-processing

use ndarray::Array1;

pub fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max_val = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_vals: Array1<f32> = logits.mapv(|x| (x - max_val).exp());
    let sum_exp: f32 = exp_vals.sum();
    exp_vals.mapv(|v| v / sum_exp)
}

/// Index and value of the largest element; first wins on ties
pub fn argmax_and_max(probs: &Array1<f32>) -> (usize, f32) {
    probs
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(max_idx, max_val), (i, &val)| {
            if val > max_val {
                (i, val)
            } else {
                (max_idx, max_val)
            }
        })
}

/// Top class and its probability as a percentage
pub fn top_class(logits: &[f32]) -> Option<(usize, f64)> {
    if logits.is_empty() {
        return None;
    }
    let probs = softmax(&Array1::from_vec(logits.to_vec()));
    let (index, prob) = argmax_and_max(&probs);
    if !prob.is_finite() {
        return None;
    }
    Some((index, prob as f64 * 100.0))
}
