use std::fmt;

use ndarray::{Array1, ArrayView1};

/// One ranked class of a classification.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub class_id: usize,
    pub label: String,
    pub probability: f32,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.probability)
    }
}

/// Turns raw class scores into a probability distribution.
///
/// The maximum is subtracted before exponentiating so large logits don't overflow.
pub fn softmax(logits: ArrayView1<f32>) -> Array1<f32> {
    let max = logits.fold(f32::NEG_INFINITY, |m, &z| m.max(z));
    let mut exp = logits.mapv(|z| (z - max).exp());
    let sum = exp.sum();
    exp /= sum;
    exp
}

/// Ranks the classes by descending probability and keeps the first `k`.
///
/// Ties keep ascending class id order, `k` larger than the amount of classes keeps them all.
pub fn top_k(probs: ArrayView1<f32>, k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}
