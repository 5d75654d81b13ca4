//! JSON Model Artifacts
//!
//! Lightweight serialized models: a linear scorer (weight matrix plus
//! intercepts, probability-capable via softmax) and a nearest-centroid
//! classifier (label only). Both are tagged by `model_type` in the JSON.

use std::path::Path;
use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::classifier::{argmax_min_index, softmax, Classifier};
use crate::error::DetectionError;
use crate::features::FeatureMatrix;
use crate::taxonomy::NUM_CLASSES;

// ============================================================================
// ARTIFACT FORMAT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "lowercase")]
pub enum ModelArtifact {
    /// Linear scorer: one weight row per class, scores = W x + b
    Linear {
        weights: Vec<Vec<f32>>,
        intercepts: Vec<f32>,
    },
    /// Nearest centroid: one centroid per class
    Centroid { centroids: Vec<Vec<f32>> },
}

/// Parse a JSON artifact file into a ready classifier
pub fn load_json_artifact(
    name: &str,
    path: &Path,
) -> Result<Arc<dyn Classifier>, DetectionError> {
    let text = std::fs::read_to_string(path).map_err(|e| DetectionError::ModelLoad {
        model: name.to_string(),
        reason: format!("cannot read artifact: {}", e),
    })?;
    let artifact: ModelArtifact =
        serde_json::from_str(&text).map_err(|e| DetectionError::ModelLoad {
            model: name.to_string(),
            reason: format!("corrupt artifact: {}", e),
        })?;
    instantiate(name, artifact)
}

pub fn instantiate(
    name: &str,
    artifact: ModelArtifact,
) -> Result<Arc<dyn Classifier>, DetectionError> {
    match artifact {
        ModelArtifact::Linear { weights, intercepts } => {
            let model = LinearClassifier::new(name, weights, intercepts)?;
            Ok(Arc::new(model))
        }
        ModelArtifact::Centroid { centroids } => {
            let model = CentroidClassifier::new(name, centroids)?;
            Ok(Arc::new(model))
        }
    }
}

fn to_class_matrix(
    name: &str,
    rows: Vec<Vec<f32>>,
    what: &str,
) -> Result<Array2<f32>, DetectionError> {
    if rows.len() != NUM_CLASSES {
        return Err(DetectionError::ModelLoad {
            model: name.to_string(),
            reason: format!("expected {} {} rows, got {}", NUM_CLASSES, what, rows.len()),
        });
    }
    let width = rows[0].len();
    if width == 0 || rows.iter().any(|r| r.len() != width) {
        return Err(DetectionError::ModelLoad {
            model: name.to_string(),
            reason: format!("{} rows are ragged or empty", what),
        });
    }
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((NUM_CLASSES, width), flat).map_err(|e| {
        DetectionError::ModelLoad {
            model: name.to_string(),
            reason: e.to_string(),
        }
    })
}

// ============================================================================
// LINEAR CLASSIFIER
// ============================================================================

#[derive(Debug)]
pub struct LinearClassifier {
    name: String,
    weights: Array2<f32>,
    intercepts: Vec<f32>,
}

impl LinearClassifier {
    pub fn new(
        name: &str,
        weights: Vec<Vec<f32>>,
        intercepts: Vec<f32>,
    ) -> Result<Self, DetectionError> {
        let weights = to_class_matrix(name, weights, "weight")?;
        if intercepts.len() != NUM_CLASSES {
            return Err(DetectionError::ModelLoad {
                model: name.to_string(),
                reason: format!(
                    "expected {} intercepts, got {}",
                    NUM_CLASSES,
                    intercepts.len()
                ),
            });
        }
        Ok(Self {
            name: name.to_string(),
            weights,
            intercepts,
        })
    }

    fn check_width(&self, features: &FeatureMatrix) -> Result<(), DetectionError> {
        if features.width() != self.weights.ncols() {
            return Err(DetectionError::ModelPredict {
                model: self.name.clone(),
                reason: format!(
                    "feature width {} does not match model width {}",
                    features.width(),
                    self.weights.ncols()
                ),
            });
        }
        Ok(())
    }
}

impl Classifier for LinearClassifier {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn has_probability(&self) -> bool {
        true
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<usize>, DetectionError> {
        let proba = self.predict_proba(features)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| argmax_min_index(&row.to_vec()))
            .collect())
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Array2<f32>, DetectionError> {
        self.check_width(features)?;
        let mut proba = Array2::<f32>::zeros((features.rows(), NUM_CLASSES));
        for (row_idx, row) in features.data().rows().into_iter().enumerate() {
            let mut scores = vec![0.0f32; NUM_CLASSES];
            for (class, weights) in self.weights.rows().into_iter().enumerate() {
                let dot: f32 = row.iter().zip(weights.iter()).map(|(x, w)| x * w).sum();
                scores[class] = dot + self.intercepts[class];
            }
            for (class, p) in softmax(&scores).into_iter().enumerate() {
                proba[[row_idx, class]] = p;
            }
        }
        Ok(proba)
    }
}

// ============================================================================
// CENTROID CLASSIFIER
// ============================================================================

/// Nearest-centroid model. Label only; exposes no probabilities.
#[derive(Debug)]
pub struct CentroidClassifier {
    name: String,
    centroids: Array2<f32>,
}

impl CentroidClassifier {
    pub fn new(name: &str, centroids: Vec<Vec<f32>>) -> Result<Self, DetectionError> {
        let centroids = to_class_matrix(name, centroids, "centroid")?;
        Ok(Self {
            name: name.to_string(),
            centroids,
        })
    }
}

impl Classifier for CentroidClassifier {
    fn kind(&self) -> &'static str {
        "centroid"
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<usize>, DetectionError> {
        if features.width() != self.centroids.ncols() {
            return Err(DetectionError::ModelPredict {
                model: self.name.clone(),
                reason: format!(
                    "feature width {} does not match centroid width {}",
                    features.width(),
                    self.centroids.ncols()
                ),
            });
        }
        let labels = features
            .data()
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0usize;
                let mut best_dist = f32::INFINITY;
                for (class, centroid) in self.centroids.rows().into_iter().enumerate() {
                    let dist: f32 = row
                        .iter()
                        .zip(centroid.iter())
                        .map(|(x, c)| (x - c) * (x - c))
                        .sum();
                    // strict < keeps the smallest class index on exact ties
                    if dist < best_dist {
                        best_dist = dist;
                        best = class;
                    }
                }
                best
            })
            .collect();
        Ok(labels)
    }
}

// ============================================================================
// TESTS
// ============================================================================
