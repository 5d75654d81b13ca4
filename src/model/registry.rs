//! Classifier Registry
//!
//! Materializes and owns the named classifier set. A missing or corrupt
//! artifact never aborts construction: the failure is recorded with its
//! reason and the registry operates degraded with the models that did load.
//! Artifacts load in parallel; one model's failure cannot poison another's.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::artifact::load_json_artifact;
use super::classifier::Classifier;
use super::onnx::OnnxClassifier;
use crate::error::DetectionError;

// ============================================================================
// MODEL INFO
// ============================================================================

/// Introspection entry for one configured model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub loaded: bool,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============================================================================
// REGISTRY
// ============================================================================

pub struct Registry {
    models: BTreeMap<String, Arc<dyn Classifier>>,
    unloaded: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            models: BTreeMap::new(),
            unloaded: BTreeMap::new(),
        }
    }

    /// Attempt to materialize a classifier for every named artifact path.
    /// Never fails; failed loads are recorded and surfaced via `info()`.
    pub fn load(model_paths: &BTreeMap<String, PathBuf>) -> Registry {
        let results: Vec<(String, Result<Arc<dyn Classifier>, DetectionError>)> =
            std::thread::scope(|scope| {
                let handles: Vec<_> = model_paths
                    .iter()
                    .map(|(name, path)| {
                        let handle = scope.spawn(move || load_artifact(name, path));
                        (name.clone(), handle)
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|(name, handle)| {
                        let result = handle.join().unwrap_or_else(|_| {
                            Err(DetectionError::ModelLoad {
                                model: name.clone(),
                                reason: "loader panicked".to_string(),
                            })
                        });
                        (name, result)
                    })
                    .collect()
            });

        let mut registry = Registry::new();
        for (name, result) in results {
            match result {
                Ok(model) => {
                    log::info!("loaded model '{}' ({})", name, model.kind());
                    registry.models.insert(name, model);
                }
                Err(e) => {
                    log::warn!("model '{}' unavailable: {}", name, e);
                    registry.unloaded.insert(name, e.to_string());
                }
            }
        }
        registry
    }

    /// Register an externally-supplied classifier instance
    pub fn register(&mut self, name: impl Into<String>, model: Arc<dyn Classifier>) {
        let name = name.into();
        self.unloaded.remove(&name);
        self.models.insert(name, model);
    }

    /// Record an explicit absence signal from the model provisioner
    pub fn record_failure(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        let name = name.into();
        self.models.remove(&name);
        self.unloaded.insert(name, reason.into());
    }

    /// Per-model metadata. Introspection only, no side effects.
    pub fn info(&self) -> BTreeMap<String, ModelInfo> {
        let mut info = BTreeMap::new();
        for (name, model) in &self.models {
            info.insert(
                name.clone(),
                ModelInfo {
                    loaded: true,
                    kind: model.kind().to_string(),
                    reason: None,
                },
            );
        }
        for (name, reason) in &self.unloaded {
            info.insert(
                name.clone(),
                ModelInfo {
                    loaded: false,
                    kind: "unloaded".to_string(),
                    reason: Some(reason.clone()),
                },
            );
        }
        info
    }

    /// Loaded models in stable name order
    pub fn models(&self) -> impl Iterator<Item = (&str, &Arc<dyn Classifier>)> {
        self.models.iter().map(|(name, model)| (name.as_str(), model))
    }

    /// Number of loaded models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn load_artifact(name: &str, path: &Path) -> Result<Arc<dyn Classifier>, DetectionError> {
    if !path.exists() {
        return Err(DetectionError::ModelLoad {
            model: name.to_string(),
            reason: format!("artifact not found: {}", path.display()),
        });
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("onnx") => Ok(Arc::new(OnnxClassifier::load(name, path)?)),
        Some("json") => load_json_artifact(name, path),
        other => Err(DetectionError::ModelLoad {
            model: name.to_string(),
            reason: format!("unsupported artifact format: {:?}", other.unwrap_or("none")),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureMatrix;
    use crate::model::artifact::ModelArtifact;

    #[derive(Debug)]
    struct ConstantModel {
        label: usize,
    }

    impl Classifier for ConstantModel {
        fn kind(&self) -> &'static str {
            "mock"
        }

        fn predict(&self, features: &FeatureMatrix) -> Result<Vec<usize>, DetectionError> {
            Ok(vec![self.label; features.rows()])
        }
    }

    fn write_centroid_artifact(dir: &Path, file: &str) -> PathBuf {
        let path = dir.join(file);
        let artifact = ModelArtifact::Centroid {
            centroids: vec![vec![0.0, 0.0]; 5],
        };
        std::fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_missing_artifact_recorded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = BTreeMap::new();
        paths.insert(
            "ghost".to_string(),
            dir.path().join("does_not_exist.json"),
        );
        paths.insert(
            "cent".to_string(),
            write_centroid_artifact(dir.path(), "cent.json"),
        );

        let registry = Registry::load(&paths);
        assert_eq!(registry.len(), 1);

        let info = registry.info();
        assert!(!info["ghost"].loaded);
        assert!(info["ghost"].reason.as_ref().unwrap().contains("not found"));
        assert!(info["cent"].loaded);
        assert_eq!(info["cent"].kind, "centroid");
    }

    #[test]
    fn test_corrupt_artifact_degrades_only_itself() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{garbage").unwrap();

        let mut paths = BTreeMap::new();
        paths.insert("broken".to_string(), broken);
        paths.insert(
            "cent".to_string(),
            write_centroid_artifact(dir.path(), "cent.json"),
        );

        let registry = Registry::load(&paths);
        assert_eq!(registry.len(), 1);
        assert!(!registry.info()["broken"].loaded);
    }

    #[test]
    fn test_unsupported_extension_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let pkl = dir.path().join("model.pkl");
        std::fs::write(&pkl, b"\x80\x04").unwrap();

        let mut paths = BTreeMap::new();
        paths.insert("pickle".to_string(), pkl);

        let registry = Registry::load(&paths);
        assert!(registry.is_empty());
        let info = registry.info();
        assert!(info["pickle"]
            .reason
            .as_ref()
            .unwrap()
            .contains("unsupported"));
    }

    #[test]
    fn test_register_external_model() {
        let mut registry = Registry::new();
        registry.register("mock_a", Arc::new(ConstantModel { label: 1 }));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.info()["mock_a"].kind, "mock");
    }

    #[test]
    fn test_register_clears_prior_failure() {
        let mut registry = Registry::new();
        registry.record_failure("flaky", "first attempt failed");
        assert!(!registry.info()["flaky"].loaded);

        registry.register("flaky", Arc::new(ConstantModel { label: 0 }));
        assert!(registry.info()["flaky"].loaded);
    }

    #[test]
    fn test_models_iterate_in_name_order() {
        let mut registry = Registry::new();
        registry.register("zeta", Arc::new(ConstantModel { label: 0 }));
        registry.register("alpha", Arc::new(ConstantModel { label: 1 }));

        let names: Vec<&str> = registry.models().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::load(&BTreeMap::new());
        assert!(registry.is_empty());
        assert!(registry.info().is_empty());
    }
}
