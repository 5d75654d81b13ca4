//! Classifier Capability
//!
//! Uniform interface every loaded model sits behind. Probability support is
//! an explicit tag (`has_probability`), so soft voting's fallback path is a
//! visible branch instead of reflection on the concrete type.

use ndarray::Array2;

use crate::error::DetectionError;
use crate::features::FeatureMatrix;

pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Short artifact kind tag ("onnx", "linear", "centroid", ...)
    fn kind(&self) -> &'static str;

    /// Whether `predict_proba` is supported
    fn has_probability(&self) -> bool {
        false
    }

    /// Per-row class index over the whole matrix
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<usize>, DetectionError>;

    /// Per-row probability vector over the attack classes.
    /// Only meaningful when `has_probability()` is true.
    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Array2<f32>, DetectionError> {
        let _ = features;
        Err(DetectionError::ModelPredict {
            model: self.kind().to_string(),
            reason: "probability output not supported".to_string(),
        })
    }
}

/// Index of the largest value; ties resolve to the smallest index
pub(crate) fn argmax_min_index(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in scores.iter().enumerate().skip(1) {
        if v > scores[best] {
            best = i;
        }
    }
    best
}

/// Numerically stable softmax over one score row
pub(crate) fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_smallest_on_tie() {
        assert_eq!(argmax_min_index(&[0.2, 0.5, 0.5, 0.1]), 1);
        assert_eq!(argmax_min_index(&[1.0, 1.0, 1.0]), 0);
        assert_eq!(argmax_min_index(&[0.0, 0.0, 0.3]), 2);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_handles_large_scores() {
        let probs = softmax(&[1000.0, 1001.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
    }
}
