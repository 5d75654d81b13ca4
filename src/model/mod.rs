//! Model Module - Classifier Loading and Ownership
//!
//! - `classifier` - the uniform prediction capability
//! - `artifact` - JSON-serialized linear and centroid models
//! - `onnx` - ONNX Runtime backed models
//! - `registry` - named model set with degraded-mode loading

pub mod artifact;
pub mod classifier;
pub mod onnx;
pub mod registry;

// Re-export common types
pub use artifact::{CentroidClassifier, LinearClassifier, ModelArtifact};
pub use classifier::Classifier;
pub use onnx::OnnxClassifier;
pub use registry::{ModelInfo, Registry};
