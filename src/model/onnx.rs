//! ONNX Classifier - ONNX Runtime Integration
//!
//! Wraps an `ort` session behind the Classifier trait. The session needs
//! `&mut` to run, so it sits behind a `parking_lot::Mutex`; everything else
//! is immutable after load.

use std::path::Path;

use ndarray::Array2;
use parking_lot::Mutex;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;

use super::classifier::{argmax_min_index, softmax, Classifier};
use crate::error::DetectionError;
use crate::features::FeatureMatrix;
use crate::taxonomy::NUM_CLASSES;

#[derive(Debug)]
pub struct OnnxClassifier {
    name: String,
    session: Mutex<Session>,
    loaded_at: chrono::DateTime<chrono::Utc>,
}

impl OnnxClassifier {
    /// Load an ONNX model from a file. The model must emit one score per
    /// attack class per input row.
    pub fn load(name: &str, path: &Path) -> Result<Self, DetectionError> {
        log::info!("loading ONNX model '{}' from {}", name, path.display());

        let session = Session::builder()
            .map_err(|e| load_error(name, format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(name, format!("optimization level: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| load_error(name, format!("load failed: {}", e)))?;

        log::info!("ONNX model '{}' loaded", name);

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
            loaded_at: chrono::Utc::now(),
        })
    }

    pub fn loaded_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.loaded_at
    }

    fn run(&self, features: &FeatureMatrix) -> Result<Vec<f32>, DetectionError> {
        let mut session = self.session.lock();

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| self.predict_error("model defines no output"))?;

        let input_array: Array2<f32> = features.data().clone();
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| self.predict_error(format!("tensor error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| self.predict_error(format!("inference failed: {}", e)))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| self.predict_error("no output produced"))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| self.predict_error(format!("extract error: {}", e)))?;

        Ok(output_tensor.1.to_vec())
    }

    fn predict_error(&self, reason: impl Into<String>) -> DetectionError {
        DetectionError::ModelPredict {
            model: self.name.clone(),
            reason: reason.into(),
        }
    }
}

fn load_error(name: &str, reason: String) -> DetectionError {
    DetectionError::ModelLoad {
        model: name.to_string(),
        reason,
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "onnx"
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
        let data = self.run(features)?;
        let rows = features.rows();

        if data.len() != rows * NUM_CLASSES {
            return Err(self.predict_error(format!(
                "expected {} output scores for {} rows, got {}",
                rows * NUM_CLASSES,
                rows,
                data.len()
            )));
        }

        // The output scores are treated as unnormalized logits
        let mut proba = Array2::<f32>::zeros((rows, NUM_CLASSES));
        for row in 0..rows {
            let scores = &data[row * NUM_CLASSES..(row + 1) * NUM_CLASSES];
            for (class, p) in softmax(scores).into_iter().enumerate() {
                proba[[row, class]] = p;
            }
        }
        Ok(proba)
    }
}
