//! One-Hot Encoding
//!
//! Replaces categorical columns with one binary column per allowed value.
//! Output column order: surviving numeric columns in original relative
//! order, then one-hot blocks in categorical-column order, each block in
//! allowed-value declaration order. Comparison is exact string equality,
//! case-sensitive. A cell outside the allowed set leaves its block all-zero.

use ndarray::Array2;

use super::matrix::{RawMatrix, RawValue};
use crate::error::DetectionError;

pub fn one_hot_encode(
    matrix: &RawMatrix,
    categorical_columns: &[(usize, Vec<String>)],
) -> Result<Array2<f32>, DetectionError> {
    let numeric_columns: Vec<usize> = (0..matrix.cols())
        .filter(|c| !categorical_columns.iter().any(|(cat, _)| cat == c))
        .collect();

    let one_hot_width: usize = categorical_columns.iter().map(|(_, v)| v.len()).sum();
    let width = numeric_columns.len() + one_hot_width;
    let mut encoded = Array2::<f32>::zeros((matrix.rows(), width));

    for row in 0..matrix.rows() {
        for (out_col, &col) in numeric_columns.iter().enumerate() {
            let value = matrix.get(row, col).as_num().ok_or_else(|| {
                DetectionError::FeatureConversion {
                    row,
                    field: format!("column {}", col),
                    value: matrix.get(row, col).as_text().unwrap_or("").to_string(),
                }
            })?;
            encoded[[row, out_col]] = value;
        }

        let mut block_start = numeric_columns.len();
        for (col, allowed) in categorical_columns {
            if let RawValue::Text(cell) = matrix.get(row, *col) {
                if let Some(slot) = allowed.iter().position(|v| v == cell) {
                    encoded[[row, block_start + slot]] = 1.0;
                }
            }
            block_start += allowed.len();
        }
    }

    Ok(encoded)
}

// ============================================================================
// TESTS
// ============================================================================
