//! Numeric Normalization
//!
//! Min-max scales each numeric column independently to [0,1], optionally
//! clipping outliers to the IQR robust range [Q1 - 1.5*IQR, Q3 + 1.5*IQR]
//! first. A constant column normalizes to all zeros.

use super::matrix::{RawMatrix, RawValue};
use crate::error::DetectionError;

const IQR_FACTOR: f32 = 1.5;

/// Normalize the listed numeric columns of `matrix` in place
pub fn normalize(
    matrix: &mut RawMatrix,
    numeric_columns: &[usize],
    clip_outliers: bool,
) -> Result<(), DetectionError> {
    if matrix.rows() == 0 {
        return Ok(());
    }

    for &col in numeric_columns {
        let mut values = column_values(matrix, col)?;

        if clip_outliers {
            let mut sorted = values.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let q1 = percentile(&sorted, 25.0);
            let q3 = percentile(&sorted, 75.0);
            let iqr = q3 - q1;
            let lower = q1 - IQR_FACTOR * iqr;
            let upper = q3 + IQR_FACTOR * iqr;
            for v in values.iter_mut() {
                *v = v.clamp(lower, upper);
            }
        }

        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;

        for (row, v) in values.into_iter().enumerate() {
            let scaled = if range > 0.0 { (v - min) / range } else { 0.0 };
            matrix.set(row, col, RawValue::Num(scaled));
        }
    }

    Ok(())
}

/// Linear-interpolation percentile over a pre-sorted slice, `p` in [0,100]
pub(crate) fn percentile(sorted: &[f32], p: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f32;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

fn column_values(matrix: &RawMatrix, col: usize) -> Result<Vec<f32>, DetectionError> {
    (0..matrix.rows())
        .map(|row| {
            matrix.get(row, col).as_num().ok_or_else(|| {
                DetectionError::FeatureConversion {
                    row,
                    field: format!("column {}", col),
                    value: matrix.get(row, col).as_text().unwrap_or("").to_string(),
                }
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_from_column(values: &[f32]) -> RawMatrix {
        let mut m = RawMatrix::new(values.len(), 1);
        for (row, &v) in values.iter().enumerate() {
            m.set(row, 0, RawValue::Num(v));
        }
        m
    }

    fn column(m: &RawMatrix) -> Vec<f32> {
        (0..m.rows()).map(|r| m.get(r, 0).as_num().unwrap()).collect()
    }

    #[test]
    fn test_minmax_scales_to_unit_range() {
        let mut m = matrix_from_column(&[0.0, 5.0, 10.0]);
        normalize(&mut m, &[0], false).unwrap();
        assert_eq!(column(&m), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_constant_column_normalizes_to_zero() {
        let mut m = matrix_from_column(&[5.0, 5.0, 5.0, 5.0]);
        normalize(&mut m, &[0], true).unwrap();
        assert_eq!(column(&m), vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_clipping_caps_extreme_outlier() {
        // Without clipping the outlier pins everything else near zero
        let values = [1.0, 2.0, 3.0, 4.0, 1000.0];

        let mut plain = matrix_from_column(&values);
        normalize(&mut plain, &[0], false).unwrap();
        let mut clipped = matrix_from_column(&values);
        normalize(&mut clipped, &[0], true).unwrap();

        assert!(column(&plain)[1] < 0.01);
        assert!(column(&clipped)[1] > 0.1);
        // The clipped column still spans the full unit range
        assert_eq!(column(&clipped)[0], 0.0);
        assert_eq!(column(&clipped)[4], 1.0);
    }

    #[test]
    fn test_idempotent_without_clipping() {
        let mut m = matrix_from_column(&[3.0, 7.0, 11.0, 19.0]);
        normalize(&mut m, &[0], false).unwrap();
        let once = column(&m);
        normalize(&mut m, &[0], false).unwrap();
        assert_eq!(column(&m), once);
    }

    #[test]
    fn test_renormalizing_outlier_free_data_is_noop() {
        // Evenly spread data has no IQR outliers, so the clipping pass
        // leaves already-normalized values unchanged
        let mut m = matrix_from_column(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        normalize(&mut m, &[0], true).unwrap();
        let once = column(&m);
        normalize(&mut m, &[0], true).unwrap();
        for (a, b) in column(&m).iter().zip(once.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        assert_eq!(percentile(&sorted, 50.0), 2.5);
        assert_eq!(percentile(&sorted, 25.0), 1.75);
    }

    #[test]
    fn test_text_cell_in_numeric_column_fails() {
        let mut m = RawMatrix::new(1, 1);
        m.set(0, 0, RawValue::Text("tcp".to_string()));
        assert!(normalize(&mut m, &[0], false).is_err());
    }

    #[test]
    fn test_empty_matrix_is_noop() {
        let mut m = RawMatrix::new(0, 3);
        assert!(normalize(&mut m, &[0, 2], true).is_ok());
    }
}
