//! Feature Codec
//!
//! Composes extraction, normalization, and one-hot encoding into the one
//! call the rest of the engine uses. Deterministic and side-effect-free:
//! the same records and spec always produce the same matrix.

use super::encode::one_hot_encode;
use super::extract::extract_from_records;
use super::matrix::{FeatureMatrix, RawMatrix, RawRecord};
use super::normalize::normalize;
use super::schema::FeatureSpec;
use crate::error::DetectionError;

#[derive(Debug, Clone)]
pub struct FeatureCodec {
    clip_outliers: bool,
}

impl FeatureCodec {
    pub fn new() -> Self {
        Self { clip_outliers: true }
    }

    pub fn with_clipping(clip_outliers: bool) -> Self {
        Self { clip_outliers }
    }

    /// Records → encoded feature matrix
    pub fn preprocess(
        &self,
        records: &[RawRecord],
        spec: &FeatureSpec,
    ) -> Result<FeatureMatrix, DetectionError> {
        let raw = extract_from_records(records, spec)?;
        self.preprocess_matrix(raw, spec)
    }

    /// Already-extracted raw matrix → encoded feature matrix.
    /// The numeric/categorical column partition is derived from `spec`.
    pub fn preprocess_matrix(
        &self,
        mut raw: RawMatrix,
        spec: &FeatureSpec,
    ) -> Result<FeatureMatrix, DetectionError> {
        normalize(&mut raw, &spec.numeric_columns(), self.clip_outliers)?;
        let encoded = one_hot_encode(&raw, &spec.categorical_columns())?;
        log::debug!(
            "preprocessed {} rows into {} encoded columns",
            encoded.nrows(),
            encoded.ncols()
        );
        Ok(FeatureMatrix::new(spec, encoded))
    }
}

impl Default for FeatureCodec {
    fn default() -> Self {
        Self::new()
    }
}
