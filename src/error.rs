//! Error handling
//!
//! One crate-wide error type. Per-model failures (`ModelLoad`, `ModelPredict`,
//! `InvalidLabel`) are recorded and degrade the ensemble; they never abort a
//! call on their own. `NoModelsAvailable` is the only fatal condition at
//! prediction time.

use std::fmt;

pub type DetectionResult<T> = Result<T, DetectionError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DetectionError {
    /// Malformed value in a numeric column (absent fields default instead)
    FeatureConversion {
        row: usize,
        field: String,
        value: String,
    },

    /// Registry empty, or every loaded model failed for this call
    NoModelsAvailable,

    /// Unknown voting policy token
    UnsupportedVotingPolicy(String),

    /// Artifact failed to load; recorded per model, surfaced via `Registry::info()`
    ModelLoad { model: String, reason: String },

    /// A model failed while predicting; the model is omitted for the call
    ModelPredict { model: String, reason: String },

    /// A model emitted a class index outside the attack taxonomy
    InvalidLabel {
        model: String,
        row: usize,
        label: usize,
    },
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionError::FeatureConversion { row, field, value } => {
                write!(
                    f,
                    "malformed value {:?} for numeric field '{}' in row {}",
                    value, field, row
                )
            }
            DetectionError::NoModelsAvailable => {
                write!(f, "no models available for prediction")
            }
            DetectionError::UnsupportedVotingPolicy(token) => {
                write!(f, "unsupported voting policy: '{}'", token)
            }
            DetectionError::ModelLoad { model, reason } => {
                write!(f, "failed to load model '{}': {}", model, reason)
            }
            DetectionError::ModelPredict { model, reason } => {
                write!(f, "model '{}' failed to predict: {}", model, reason)
            }
            DetectionError::InvalidLabel { model, row, label } => {
                write!(
                    f,
                    "model '{}' emitted class index {} for row {}, outside the attack taxonomy",
                    model, label, row
                )
            }
        }
    }
}

impl std::error::Error for DetectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_row_and_field() {
        let err = DetectionError::FeatureConversion {
            row: 3,
            field: "src_bytes".to_string(),
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("src_bytes"));
        assert!(msg.contains("row 3"));
    }

    #[test]
    fn test_display_policy_token() {
        let err = DetectionError::UnsupportedVotingPolicy("fuzzy".to_string());
        assert!(err.to_string().contains("fuzzy"));
    }
}
