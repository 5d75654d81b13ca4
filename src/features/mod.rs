//! Features Module - Feature Preprocessing Pipeline
//!
//! Turns raw traffic records (field name → value) into the fixed-width
//! numeric matrix every classifier consumes.
//!
//! - `schema` - field tables, FeatureSpec, layout versioning
//! - `matrix` - RawMatrix (mixed cells) and FeatureMatrix (encoded)
//! - `extract` - records → raw matrix, default policy for absent fields
//! - `normalize` - IQR clipping + min-max scaling
//! - `encode` - one-hot encoding of categorical columns
//! - `codec` - the composed pipeline

pub mod codec;
pub mod encode;
pub mod extract;
pub mod matrix;
pub mod normalize;
pub mod schema;


// Re-export common types
pub use codec::FeatureCodec;
pub use matrix::{FeatureMatrix, RawMatrix, RawRecord, RawValue};
pub use schema::{FeatureSpec, FieldKind, FieldSpec, SPEC_VERSION};
