//! Matrix Types - Raw and Encoded Feature Data
//!
//! `RawMatrix` holds mixed numeric/string cells aligned 1:1 with the
//! FeatureSpec field order. `FeatureMatrix` is the encoded, all-numeric
//! output of the codec, stamped with the layout version and hash it was
//! built against (never trust an unstamped matrix across a model boundary).

use ndarray::Array2;

use super::schema::FeatureSpec;

/// One traffic observation: field name → raw JSON value.
/// Fields may be absent; the codec applies the per-kind default policy.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// RAW MATRIX
// ============================================================================

/// A single raw cell, before normalization and encoding
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Num(f32),
    Text(String),
}

impl RawValue {
    pub fn as_num(&self) -> Option<f32> {
        match self {
            RawValue::Num(v) => Some(*v),
            RawValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Num(_) => None,
            RawValue::Text(s) => Some(s.as_str()),
        }
    }
}

/// Rectangular mixed-cell matrix, rows = records, columns = spec fields
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<RawValue>,
}

impl RawMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![RawValue::Num(0.0); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> &RawValue {
        &self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: RawValue) {
        self.cells[row * self.cols + col] = value;
    }
}

// ============================================================================
// FEATURE MATRIX
// ============================================================================

/// Encoded numeric feature matrix ready for model input.
///
/// Column layout: all numeric fields first (FeatureSpec order, normalized to
/// [0,1]), then one one-hot block per categorical field in FeatureSpec order.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Layout version of the spec this matrix was encoded against
    pub version: u8,
    /// Layout hash of that spec, for mismatch detection
    pub layout_hash: u32,
    data: Array2<f32>,
}

impl FeatureMatrix {
    pub fn new(spec: &FeatureSpec, data: Array2<f32>) -> Self {
        Self {
            version: spec.version(),
            layout_hash: spec.layout_hash(),
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// One encoded row as a slice view
    pub fn row(&self, index: usize) -> ndarray::ArrayView1<'_, f32> {
        self.data.row(index)
    }

    /// Whether this matrix was encoded against the given spec's layout
    pub fn is_compatible(&self, spec: &FeatureSpec) -> bool {
        self.version == spec.version() && self.layout_hash == spec.layout_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::schema::FieldSpec;

    #[test]
    fn test_raw_matrix_defaults_to_zero() {
        let m = RawMatrix::new(2, 3);
        assert_eq!(m.get(1, 2), &RawValue::Num(0.0));
    }

    #[test]
    fn test_raw_matrix_set_get() {
        let mut m = RawMatrix::new(2, 2);
        m.set(0, 1, RawValue::Text("tcp".to_string()));
        assert_eq!(m.get(0, 1).as_text(), Some("tcp"));
        assert_eq!(m.get(0, 0).as_num(), Some(0.0));
    }

    #[test]
    fn test_feature_matrix_compatibility() {
        let spec = FeatureSpec::new(vec![FieldSpec::numeric("a")]);
        let other = FeatureSpec::new(vec![FieldSpec::numeric("b")]);
        let m = FeatureMatrix::new(&spec, Array2::zeros((1, 1)));
        assert!(m.is_compatible(&spec));
        assert!(!m.is_compatible(&other));
    }
}
